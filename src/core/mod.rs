//! Valuation model and the abstractions around it

pub mod config;
pub mod evaluator;
pub mod format;
pub mod log;
pub mod model;
pub mod price;
pub mod valuation;

// Re-export main types for cleaner imports
pub use evaluator::{EvaluationResult, Evaluator, ModelBand, SecondaryValuation};
pub use model::ModelParameters;
pub use price::{Asset, PriceProvider, PriceQuote};
pub use valuation::{StatusKind, ValuationResult};

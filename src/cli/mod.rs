pub mod fair;
pub mod setup;
pub mod show;
pub mod ui;

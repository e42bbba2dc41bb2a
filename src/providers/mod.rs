pub mod coinbase;
pub mod coingecko;
pub mod fallback;
pub mod util;

pub use coinbase::CoinbaseProvider;
pub use coingecko::CoinGeckoProvider;
pub use fallback::FallbackProvider;

mod binance;

pub use binance::{BinanceAdapter, API_KEY_ENV};

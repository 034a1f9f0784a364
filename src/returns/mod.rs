//! Time-indexed price and return series, and loading of cached price files

mod data;
pub mod loader;

pub use data::{DualReturnSeries, PriceSeries, ReturnSeries, TimeSeries, ValueSeries};
pub use loader::{load_prices, load_prices_from_reader, load_ticker};

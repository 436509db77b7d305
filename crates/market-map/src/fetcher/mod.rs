//! Source fetcher abstractions.
//!
//! This module contains:
//! - The `MarketMapFetcher` trait every source (vendor feed or aggregate) implements
//! - The `MarketMapApiHandler` trait for the vendor-specific half of a REST source
//! - `RestApiFetcher`, which joins a handler to an HTTP transport

mod rest;
mod traits;

pub use rest::RestApiFetcher;
pub use traits::{MarketMapApiHandler, MarketMapFetcher};

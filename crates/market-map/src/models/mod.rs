//! Market-map models
//!
//! This module contains the core data types:
//! - `types` - The scope key (`Chain`) fetches are issued for
//! - `currency_pair` - Canonical `BASE/QUOTE` identity
//! - `market` - `Ticker`, `ProviderConfig`, `Market` and `MarketMap` with structural validation
//! - `response` - Partial result sets (`FetchResponse`) returned by every fetcher
//! - `ticker_metadata` - The JSON document carried in `Ticker::metadata_json`

mod currency_pair;
mod market;
mod response;
mod ticker_metadata;
mod types;

pub use currency_pair::CurrencyPair;
pub use market::{Market, MarketMap, ProviderConfig, Ticker, MAX_DECIMALS};
pub use response::{FetchResponse, MarketMapResponse, ResolvedResult, UnresolvedResult};
pub use ticker_metadata::{AggregatorId, PerpxTickerMetadata, COINMARKETCAP_VENUE};
pub use types::Chain;

//! perpx Market Map Crate
//!
//! This crate builds the canonical market map a price oracle publishes for the
//! perpx chain, from several independent and mutually untrusted sources.
//!
//! # Overview
//!
//! The crate provides:
//! - A partial-result model: every fetch reports each requested chain as
//!   resolved or unresolved, never by raising
//! - Source fetchers for the chain's canonical market params and for the
//!   perpx research document
//! - A two-source aggregator that fetches both concurrently, merges them,
//!   optionally narrows the result to a reference provider and validates it
//! - A factory that wires fetchers from named configs
//!
//! # Architecture
//!
//! ```text
//!                     +-----------------------+
//!                     |        Factory        |  (config name -> fetcher)
//!                     +-----------------------+
//!                                 |
//!                                 v
//!                     +-----------------------+
//!                     | MultiMarketMapFetcher |  (join, merge, filter, validate)
//!                     +-----------------------+
//!                        |                 |
//!                        v                 v
//!              +----------------+   +----------------+
//!              | RestApiFetcher |   | RestApiFetcher |  (transport, cancellation)
//!              +----------------+   +----------------+
//!                        |                 |
//!                        v                 v
//!           +--------------------+ +--------------------+
//!           | MarketParams       | | Research           |  (vendor document ->
//!           | ApiHandler         | | ApiHandler         |   MarketParam -> MarketMap)
//!           +--------------------+ +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketMap`] - Markets keyed by `BASE/QUOTE`
//! - [`Market`] - A [`Ticker`] and its [`ProviderConfig`]s
//! - [`FetchResponse`] - Resolved/unresolved outcome per requested [`Chain`]
//! - [`FetchError`] - Coded failure carried by an unresolved outcome
//! - [`FetchContext`] - Cancellation and deadline shared by a fetch
//! - [`MarketMapFetcher`] - The contract every source implements

pub mod aggregator;
pub mod config;
pub mod context;
pub mod errors;
pub mod factory;
pub mod fetcher;
pub mod http;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    AggregatorId, Chain, CurrencyPair, FetchResponse, Market, MarketMap, MarketMapResponse,
    PerpxTickerMetadata, ProviderConfig, ResolvedResult, Ticker, UnresolvedResult, MAX_DECIMALS,
};

// Re-export error types
pub use errors::{ConversionError, ErrorCode, FetchError, MarketMapError, ValidationError};

// Re-export fetcher and transport types
pub use context::{CancelHandle, FetchContext};
pub use fetcher::{MarketMapApiHandler, MarketMapFetcher, RestApiFetcher};
pub use http::{HttpResponse, ReqwestRequestHandler, RequestHandler};

// Re-export aggregation types
pub use aggregator::{merge_market_maps, MultiMarketMapFetcher, ReferenceFilter};

// Re-export config and factory
pub use config::{ApiConfig, Endpoint, MarketMapProviderConfig};
pub use factory::{
    default_request_handler, market_map_fetcher_factory, research_market_map_fetcher,
    ConfiguredFetcher,
};

// Re-export static tables
pub use resolver::{
    ProviderNameTable, ReferenceCatalog, DEFAULT_PROVIDER_NAMES, DEFAULT_REFERENCE_CATALOG,
};

//! Source fetcher trait definitions.
//!
//! This module defines the contract every market-map source implements,
//! whether it is a single vendor feed or an aggregate of several.

use async_trait::async_trait;

use crate::context::FetchContext;
use crate::errors::FetchError;
use crate::models::{Chain, MarketMapResponse};

/// Trait for market-map sources.
///
/// Implementations must:
/// - report an outcome for every requested chain, resolved or unresolved,
///   and never for chains that were not requested
/// - honor the context's cancellation and deadline, reporting `Cancelled`
///   rather than blocking past it
/// - be safe to call concurrently and repeatedly
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use perpx_market_map::{Chain, FetchContext, MarketMapFetcher, MarketMapResponse};
///
/// struct StaticFetcher(MarketMapResponse);
///
/// #[async_trait]
/// impl MarketMapFetcher for StaticFetcher {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     async fn fetch(&self, _ctx: &FetchContext, _chains: &[Chain]) -> MarketMapResponse {
///         self.0.clone()
///     }
/// }
/// ```
#[async_trait]
pub trait MarketMapFetcher: Send + Sync {
    /// Name used in logs to tell constituents apart.
    fn name(&self) -> &str;

    /// Fetch the market map for each requested chain.
    async fn fetch(&self, ctx: &FetchContext, chains: &[Chain]) -> MarketMapResponse;
}

/// The vendor-specific half of a REST fetcher.
///
/// A handler knows where a vendor's document lives and how to turn its body
/// into a market map; [`RestApiFetcher`](super::RestApiFetcher) does the rest.
pub trait MarketMapApiHandler: Send + Sync {
    fn name(&self) -> &str;

    /// URL to GET for the given chains. Fails with `InvalidScope` when none of
    /// the chains is served by this handler.
    fn create_url(&self, chains: &[Chain]) -> Result<String, FetchError>;

    /// Decode a 200 response body into a partial result set.
    fn parse_response(&self, chains: &[Chain], body: &[u8]) -> MarketMapResponse;
}

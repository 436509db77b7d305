use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use super::{merge_market_maps, ReferenceFilter};
use crate::context::FetchContext;
use crate::errors::FetchError;
use crate::fetcher::MarketMapFetcher;
use crate::models::{Chain, FetchResponse, MarketMapResponse, ResolvedResult};

/// Combines a primary and a secondary source into one market map.
///
/// Both sources are fetched concurrently and always awaited. Either source
/// failing fails the whole fetch; otherwise the secondary's extra markets are
/// added to the primary's, optionally narrowed by a [`ReferenceFilter`], and
/// the result is validated before it is returned.
pub struct MultiMarketMapFetcher {
    name: String,
    chain: Chain,
    primary: Arc<dyn MarketMapFetcher>,
    secondary: Arc<dyn MarketMapFetcher>,
    reference_filter: Option<ReferenceFilter>,
}

impl MultiMarketMapFetcher {
    pub fn new(
        name: impl Into<String>,
        chain: Chain,
        primary: Arc<dyn MarketMapFetcher>,
        secondary: Arc<dyn MarketMapFetcher>,
    ) -> Self {
        Self {
            name: name.into(),
            chain,
            primary,
            secondary,
            reference_filter: None,
        }
    }

    pub fn with_reference_filter(mut self, filter: ReferenceFilter) -> Self {
        self.reference_filter = Some(filter);
        self
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

#[async_trait]
impl MarketMapFetcher for MultiMarketMapFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, ctx: &FetchContext, chains: &[Chain]) -> MarketMapResponse {
        if !chains.contains(&self.chain) {
            return FetchResponse::with_err(
                chains,
                FetchError::invalid_scope(format!(
                    "{} only serves {}",
                    self.name, self.chain
                )),
            );
        }

        let (primary, secondary) = tokio::join!(
            async {
                let response = self.primary.fetch(ctx, chains).await;
                debug!(fetcher = %self.name, source = self.primary.name(), "primary fetch completed");
                response
            },
            async {
                let response = self.secondary.fetch(ctx, chains).await;
                debug!(fetcher = %self.name, source = self.secondary.name(), "secondary fetch completed");
                response
            },
        );

        if let Some(failure) = primary.unresolved.get(&self.chain) {
            error!(
                fetcher = %self.name,
                source = self.primary.name(),
                error = %failure.error,
                "primary market-map fetch failed"
            );
            return primary;
        }

        if let Some(failure) = secondary.unresolved.get(&self.chain) {
            error!(
                fetcher = %self.name,
                source = self.secondary.name(),
                error = %failure.error,
                "secondary market-map fetch failed"
            );
            return secondary;
        }

        let mut primary = primary;
        let mut secondary = secondary;
        let (Some(primary_map), Some(secondary_map)) = (
            primary.resolved.remove(&self.chain),
            secondary.resolved.remove(&self.chain),
        ) else {
            error!(fetcher = %self.name, "source reported no outcome for {}", self.chain);
            return FetchResponse::with_err(
                chains,
                FetchError::unknown(format!("a source reported no outcome for {}", self.chain)),
            );
        };

        let mut market_map = merge_market_maps(primary_map.value, secondary_map.value);

        if let Some(filter) = &self.reference_filter {
            let before = market_map.len();
            filter.apply(&mut market_map);
            info!(
                fetcher = %self.name,
                provider = filter.provider(),
                kept = market_map.len(),
                dropped = before - market_map.len(),
                "applied reference filter"
            );
        }

        if let Err(e) = market_map.validate_basic() {
            error!(fetcher = %self.name, error = %e, "combined market map failed validation");
            return FetchResponse::with_err(
                chains,
                FetchError::validation(format!("combined market map failed validation: {e}")),
            );
        }

        debug!(fetcher = %self.name, num_markets = market_map.len(), "combined market maps");

        primary.insert_resolved(
            self.chain.clone(),
            ResolvedResult::new(market_map, Utc::now()),
        );
        primary
    }
}

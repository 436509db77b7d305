use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use super::convert::market_params_to_market_map;
use super::models::QueryAllMarketParamsResponse;
use super::{chain, MARKET_PARAMS_ENDPOINT, NAME};
use crate::config::ApiConfig;
use crate::errors::{FetchError, MarketMapError};
use crate::fetcher::MarketMapApiHandler;
use crate::models::{Chain, FetchResponse, MarketMapResponse};
use crate::resolver::{ProviderNameTable, DEFAULT_PROVIDER_NAMES};

/// Api handler for the chain's canonical market params.
#[derive(Debug)]
pub struct MarketParamsApiHandler {
    name: String,
    endpoint: String,
    names: Arc<ProviderNameTable>,
}

impl MarketParamsApiHandler {
    pub fn new(api: &ApiConfig) -> Result<Self, MarketMapError> {
        if api.name != NAME {
            return Err(MarketMapError::UnexpectedName {
                expected: NAME.to_string(),
                actual: api.name.clone(),
            });
        }
        api.ensure_usable()?;

        Ok(Self::from_endpoint(
            &api.endpoints[0].url,
            Arc::clone(&DEFAULT_PROVIDER_NAMES),
        ))
    }

    /// Handler for a chain REST endpoint taken from some other config, as the
    /// research aggregator does with its first endpoint.
    pub fn from_endpoint(endpoint: &str, names: Arc<ProviderNameTable>) -> Self {
        Self {
            name: NAME.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            names,
        }
    }
}

impl MarketMapApiHandler for MarketParamsApiHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_url(&self, chains: &[Chain]) -> Result<String, FetchError> {
        if !chains.contains(&chain()) {
            return Err(FetchError::invalid_scope(format!(
                "{} is not requested from {}",
                chain(),
                self.name
            )));
        }
        Ok(format!("{}{}", self.endpoint, MARKET_PARAMS_ENDPOINT))
    }

    fn parse_response(&self, chains: &[Chain], body: &[u8]) -> MarketMapResponse {
        let perpx = chain();
        if !chains.contains(&perpx) {
            return FetchResponse::with_err(
                chains,
                FetchError::invalid_scope(format!("expected {perpx} in {} chains", chains.len())),
            );
        }

        let params: QueryAllMarketParamsResponse = match serde_json::from_slice(body) {
            Ok(params) => params,
            Err(e) => {
                error!(handler = %self.name, error = %e, "failed to decode market params");
                return FetchResponse::with_err(
                    chains,
                    FetchError::decode(format!("failed to decode market params: {e}")),
                );
            }
        };

        let market_map = match market_params_to_market_map(&params.market_params, &self.names) {
            Ok(market_map) => market_map,
            Err(e) => {
                error!(handler = %self.name, error = %e, "failed to convert market params");
                return FetchResponse::with_err(chains, e.into());
            }
        };

        debug!(handler = %self.name, markets = market_map.len(), "resolved market params");

        let mut response = FetchResponse::with_resolved(perpx, market_map, Utc::now());
        let name = &self.name;
        response.fill_missing(chains, |chain| {
            FetchError::invalid_scope(format!("chain {chain} is not served by {name}"))
        });
        response
    }
}

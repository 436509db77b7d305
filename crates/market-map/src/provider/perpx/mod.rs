//! perpx market-map sources.
//!
//! Two documents describe the perpx markets:
//! - the chain's canonical market params, served by its REST endpoint
//! - the research JSON, listing markets that may be added to the chain
//!
//! Both are converted through [`MarketParam`] into a [`MarketMap`](crate::models::MarketMap).

mod convert;
mod market_params;
mod models;
mod research;

use std::time::Duration;

use crate::config::{ApiConfig, Endpoint};
use crate::models::Chain;

pub use convert::{
    market_params_to_market_map, provider_configs_from_exchange_config, ticker_from_market_param,
};
pub use market_params::MarketParamsApiHandler;
pub use models::{
    ExchangeConfigJson, ExchangeMarketConfigJson, MarketParam, QueryAllMarketParamsResponse,
    ResearchJson, ResearchMetadata, ResearchRecord,
};
pub use research::{ResearchApiHandler, ResearchMode};

/// Chain id of perpx mainnet.
pub const CHAIN_ID: &str = "perpx-mainnet-1";

/// Canonical feed only.
pub const NAME: &str = "perpx_api";

/// Canonical feed merged with the research document.
pub const RESEARCH_API_HANDLER_NAME: &str = "perpx_research_json_api";

/// Canonical feed merged with the research document, priced by CoinMarketCap only.
pub const RESEARCH_CMC_API_HANDLER_NAME: &str = "perpx_research_json_api_cmc";

/// Path of the market-params query on the chain's REST endpoint.
pub const MARKET_PARAMS_ENDPOINT: &str = "/perpxprotocol/prices/params/market?pagination.limit=10000";

const DEFAULT_REST_ENDPOINT: &str = "http://localhost:1317";
const DEFAULT_RESEARCH_ENDPOINT: &str =
    "https://raw.githubusercontent.com/perpx-exchange/perpx-research/main/markets.json";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// The scope key every perpx source serves.
pub fn chain() -> Chain {
    Chain::new(CHAIN_ID)
}

fn default_config(name: &str, endpoints: &[&str]) -> ApiConfig {
    ApiConfig {
        name: name.to_string(),
        enabled: true,
        timeout: DEFAULT_TIMEOUT,
        interval: DEFAULT_INTERVAL,
        max_queries: 1,
        endpoints: endpoints.iter().map(|url| Endpoint::new(*url)).collect(),
    }
}

pub fn default_api_config() -> ApiConfig {
    default_config(NAME, &[DEFAULT_REST_ENDPOINT])
}

pub fn default_research_api_config() -> ApiConfig {
    default_config(
        RESEARCH_API_HANDLER_NAME,
        &[DEFAULT_REST_ENDPOINT, DEFAULT_RESEARCH_ENDPOINT],
    )
}

pub fn default_research_cmc_api_config() -> ApiConfig {
    default_config(
        RESEARCH_CMC_API_HANDLER_NAME,
        &[DEFAULT_REST_ENDPOINT, DEFAULT_RESEARCH_ENDPOINT],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        for cfg in [
            default_api_config(),
            default_research_api_config(),
            default_research_cmc_api_config(),
        ] {
            assert!(cfg.ensure_usable().is_ok(), "{} should be usable", cfg.name);
        }
        assert!(default_research_api_config().expect_endpoints(2).is_ok());
    }
}

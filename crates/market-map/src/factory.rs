//! Builds market-map fetchers from named provider configs.

use std::sync::Arc;

use log::info;

use crate::aggregator::{MultiMarketMapFetcher, ReferenceFilter};
use crate::config::{ApiConfig, MarketMapProviderConfig};
use crate::errors::MarketMapError;
use crate::fetcher::{MarketMapFetcher, RestApiFetcher};
use crate::http::{ReqwestRequestHandler, RequestHandler};
use crate::models::Chain;
use crate::provider::perpx::{
    self, MarketParamsApiHandler, ResearchApiHandler, RESEARCH_API_HANDLER_NAME,
    RESEARCH_CMC_API_HANDLER_NAME,
};
use crate::resolver::DEFAULT_PROVIDER_NAMES;

/// A fetcher ready for a polling loop, with the chains it serves.
#[derive(Clone)]
pub struct ConfiguredFetcher {
    pub name: String,
    pub fetcher: Arc<dyn MarketMapFetcher>,
    pub chains: Vec<Chain>,
}

impl std::fmt::Debug for ConfiguredFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredFetcher")
            .field("name", &self.name)
            .field("chains", &self.chains)
            .finish()
    }
}

/// Request handler configured from an api config's timeout and query limit.
pub fn default_request_handler(
    api: &ApiConfig,
) -> Result<Arc<dyn RequestHandler>, MarketMapError> {
    Ok(Arc::new(ReqwestRequestHandler::new(
        api.timeout,
        api.max_queries,
    )?))
}

/// Build the fetcher named by `config`.
///
/// | name                          | fetcher                                      |
/// |-------------------------------|----------------------------------------------|
/// | `perpx_api`                   | canonical market params                      |
/// | `perpx_research_json_api`     | canonical params merged with research        |
/// | `perpx_research_json_api_cmc` | as above, narrowed to CoinMarketCap          |
pub fn market_map_fetcher_factory(
    config: &MarketMapProviderConfig,
    request_handler: Arc<dyn RequestHandler>,
) -> Result<ConfiguredFetcher, MarketMapError> {
    config.validate_basic()?;

    let fetcher: Arc<dyn MarketMapFetcher> = match config.name.as_str() {
        perpx::NAME => Arc::new(RestApiFetcher::new(
            Arc::new(MarketParamsApiHandler::new(&config.api)?),
            request_handler,
        )),
        RESEARCH_API_HANDLER_NAME | RESEARCH_CMC_API_HANDLER_NAME => {
            Arc::new(research_market_map_fetcher(&config.api, request_handler)?)
        }
        other => return Err(MarketMapError::UnknownProvider(other.to_string())),
    };

    info!(
        "Created market-map fetcher '{}' with {} endpoint(s)",
        config.name,
        config.api.endpoints.len()
    );

    Ok(ConfiguredFetcher {
        name: config.name.clone(),
        fetcher,
        chains: vec![perpx::chain()],
    })
}

/// Canonical feed on endpoint 0 as primary, research document on endpoint 1
/// as secondary. The `_cmc` variant adds the CoinMarketCap reference filter.
pub fn research_market_map_fetcher(
    api: &ApiConfig,
    request_handler: Arc<dyn RequestHandler>,
) -> Result<MultiMarketMapFetcher, MarketMapError> {
    api.ensure_usable()?;
    api.expect_endpoints(2)?;

    let research = ResearchApiHandler::new(api)?;
    let mainnet = MarketParamsApiHandler::from_endpoint(
        &api.endpoints[0].url,
        Arc::clone(&DEFAULT_PROVIDER_NAMES),
    );

    let fetcher = MultiMarketMapFetcher::new(
        api.name.clone(),
        perpx::chain(),
        Arc::new(RestApiFetcher::new(Arc::new(mainnet), Arc::clone(&request_handler))),
        Arc::new(RestApiFetcher::new(Arc::new(research), request_handler)),
    );

    if api.name == RESEARCH_CMC_API_HANDLER_NAME {
        Ok(fetcher.with_reference_filter(ReferenceFilter::coinmarketcap()))
    } else {
        Ok(fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;
    use crate::http::HttpResponse;
    use crate::provider::perpx::{
        default_api_config, default_research_api_config, default_research_cmc_api_config,
    };
    use async_trait::async_trait;

    struct NoopRequestHandler;

    #[async_trait]
    impl RequestHandler for NoopRequestHandler {
        async fn get(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::ok(b"{}".to_vec()))
        }
    }

    fn handler() -> Arc<dyn RequestHandler> {
        Arc::new(NoopRequestHandler)
    }

    #[test]
    fn test_builds_each_known_provider() {
        for api in [
            default_api_config(),
            default_research_api_config(),
            default_research_cmc_api_config(),
        ] {
            let name = api.name.clone();
            let configured =
                market_map_fetcher_factory(&MarketMapProviderConfig::new(api), handler()).unwrap();

            assert_eq!(configured.name, name);
            assert_eq!(configured.fetcher.name(), name);
            assert_eq!(configured.chains, vec![perpx::chain()]);
        }
    }

    #[test]
    fn test_unknown_provider() {
        let mut api = default_api_config();
        api.name = "coingecko_api".to_string();

        let err = market_map_fetcher_factory(&MarketMapProviderConfig::new(api), handler())
            .unwrap_err();
        assert!(matches!(err, MarketMapError::UnknownProvider(name) if name == "coingecko_api"));
    }

    #[test]
    fn test_research_requires_two_endpoints() {
        let mut api = default_research_api_config();
        api.endpoints.truncate(1);

        let err = market_map_fetcher_factory(&MarketMapProviderConfig::new(api), handler())
            .unwrap_err();
        assert!(matches!(err, MarketMapError::EndpointCount { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_disabled_config_is_rejected() {
        let mut api = default_research_cmc_api_config();
        api.enabled = false;

        let err = market_map_fetcher_factory(&MarketMapProviderConfig::new(api), handler())
            .unwrap_err();
        assert!(matches!(err, MarketMapError::ApiDisabled(_)));
    }

    #[test]
    fn test_mismatched_names_are_rejected() {
        let mut config = MarketMapProviderConfig::new(default_api_config());
        config.name = RESEARCH_API_HANDLER_NAME.to_string();

        let err = market_map_fetcher_factory(&config, handler()).unwrap_err();
        assert!(matches!(err, MarketMapError::UnexpectedName { .. }));
    }

    #[test]
    fn test_default_request_handler() {
        assert!(default_request_handler(&default_api_config()).is_ok());
    }
}

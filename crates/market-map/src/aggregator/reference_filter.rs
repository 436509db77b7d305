use std::sync::Arc;

use tracing::{debug, info};

use crate::models::MarketMap;
use crate::resolver::{ReferenceCatalog, COINMARKETCAP_API, DEFAULT_REFERENCE_CATALOG};

/// Restricts a market map to a single reference price source.
///
/// Every surviving market ends up with a quorum of one and only reference
/// provider entries. Markets the reference source cannot price are removed.
#[derive(Clone, Debug)]
pub struct ReferenceFilter {
    provider: String,
    catalog: Arc<ReferenceCatalog>,
}

impl ReferenceFilter {
    pub fn new(provider: impl Into<String>, catalog: Arc<ReferenceCatalog>) -> Self {
        Self {
            provider: provider.into(),
            catalog,
        }
    }

    /// CoinMarketCap with the built-in catalog.
    pub fn coinmarketcap() -> Self {
        Self::new(COINMARKETCAP_API, Arc::clone(&DEFAULT_REFERENCE_CATALOG))
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// For each market:
    /// 1. force the quorum to 1
    /// 2. keep only the market's own reference entry, if it has one (the
    ///    last one when it is listed more than once)
    /// 3. otherwise take the catalog's providers for the ticker
    /// 4. otherwise drop the market
    pub fn apply(&self, market_map: &mut MarketMap) {
        market_map.markets.retain(|ticker, market| {
            market.ticker.min_provider_count = 1;

            if let Some(reference) = market
                .provider_configs
                .iter()
                .rev()
                .find(|p| p.name == self.provider)
                .cloned()
            {
                market.provider_configs = vec![reference];
                return true;
            }

            match self.catalog.get(ticker) {
                Some(providers) => {
                    debug!(ticker = %ticker, "using catalog providers");
                    market.provider_configs = providers.to_vec();
                    true
                }
                None => {
                    info!(ticker = %ticker, provider = %self.provider, "no reference market for ticker, dropping");
                    false
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrencyPair, Market, ProviderConfig, Ticker};
    use std::collections::HashMap;

    fn market(base: &str, quorum: u64, providers: Vec<ProviderConfig>) -> Market {
        Market {
            ticker: Ticker {
                currency_pair: CurrencyPair::new(base, "USD"),
                decimals: 8,
                min_provider_count: quorum,
                enabled: true,
                metadata_json: String::new(),
            },
            provider_configs: providers,
        }
    }

    fn filter() -> ReferenceFilter {
        let catalog = ReferenceCatalog::new(HashMap::from([(
            "ETH/USD".to_string(),
            vec![ProviderConfig::new(COINMARKETCAP_API, "1027")],
        )]));
        ReferenceFilter::new(COINMARKETCAP_API, Arc::new(catalog))
    }

    #[test]
    fn test_existing_reference_entry_is_kept_alone() {
        let mut market_map: MarketMap = [market(
            "BTC",
            3,
            vec![
                ProviderConfig::new("binance_ws", "BTCUSDT"),
                ProviderConfig::new(COINMARKETCAP_API, "1"),
                ProviderConfig::new("okx_ws", "BTC-USDT"),
            ],
        )]
        .into_iter()
        .collect();

        filter().apply(&mut market_map);

        let btc = &market_map.markets["BTC/USD"];
        assert_eq!(btc.ticker.min_provider_count, 1);
        assert_eq!(btc.provider_configs, vec![ProviderConfig::new(COINMARKETCAP_API, "1")]);
    }

    #[test]
    fn test_last_reference_entry_wins() {
        let mut market_map: MarketMap = [market(
            "BTC",
            2,
            vec![
                ProviderConfig::new(COINMARKETCAP_API, "1"),
                ProviderConfig::new(COINMARKETCAP_API, "9999"),
            ],
        )]
        .into_iter()
        .collect();

        let catalog = Arc::new(ReferenceCatalog::new(HashMap::new()));
        ReferenceFilter::new(COINMARKETCAP_API, catalog).apply(&mut market_map);

        assert_eq!(
            market_map.markets["BTC/USD"].provider_configs,
            vec![ProviderConfig::new(COINMARKETCAP_API, "9999")]
        );
    }

    #[test]
    fn test_catalog_providers_replace_listing() {
        let mut market_map: MarketMap = [market(
            "ETH",
            2,
            vec![
                ProviderConfig::new("binance_ws", "ETHUSDT"),
                ProviderConfig::new("okx_ws", "ETH-USDT"),
            ],
        )]
        .into_iter()
        .collect();

        filter().apply(&mut market_map);

        let eth = &market_map.markets["ETH/USD"];
        assert_eq!(eth.ticker.min_provider_count, 1);
        assert_eq!(eth.provider_configs, vec![ProviderConfig::new(COINMARKETCAP_API, "1027")]);
    }

    #[test]
    fn test_unknown_market_is_dropped() {
        let mut market_map: MarketMap = [
            market("PEPE", 2, vec![ProviderConfig::new("binance_ws", "PEPEUSDT")]),
            market("ETH", 1, vec![ProviderConfig::new("binance_ws", "ETHUSDT")]),
        ]
        .into_iter()
        .collect();

        filter().apply(&mut market_map);

        assert_eq!(market_map.markets.keys().collect::<Vec<_>>(), vec!["ETH/USD"]);
    }

    #[test]
    fn test_default_filter_uses_builtin_catalog() {
        let filter = ReferenceFilter::coinmarketcap();
        assert_eq!(filter.provider(), COINMARKETCAP_API);

        let mut market_map: MarketMap =
            [market("BTC", 3, vec![ProviderConfig::new("binance_ws", "BTCUSDT")])]
                .into_iter()
                .collect();
        filter.apply(&mut market_map);

        assert_eq!(
            market_map.markets["BTC/USD"].provider_configs,
            vec![ProviderConfig::new(COINMARKETCAP_API, "1")]
        );
        assert!(market_map.validate_basic().is_ok());
    }
}

//! Static reference-provider catalog.
//!
//! Maps tickers to the provider configs of the designated reference source.
//! The default catalog is compiled in from `reference_markets.json`
//! and built once via `lazy_static`.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::errors::MarketMapError;
use crate::models::{MarketMap, ProviderConfig};

lazy_static! {
    pub static ref DEFAULT_REFERENCE_CATALOG: Arc<ReferenceCatalog> = Arc::new(
        ReferenceCatalog::from_json(include_str!("reference_markets.json"))
            .expect("reference_markets.json must be a valid market map"),
    );
}

/// Read-only `ticker → provider configs` lookup.
#[derive(Clone, Debug, Default)]
pub struct ReferenceCatalog {
    markets: HashMap<String, Vec<ProviderConfig>>,
}

impl ReferenceCatalog {
    pub fn new(markets: HashMap<String, Vec<ProviderConfig>>) -> Self {
        Self { markets }
    }

    /// Take the provider lists of every market in a market map.
    pub fn from_market_map(market_map: MarketMap) -> Self {
        let markets = market_map
            .markets
            .into_iter()
            .map(|(ticker, market)| (ticker, market.provider_configs))
            .collect();
        Self { markets }
    }

    /// Load a catalog from a serialized market map.
    pub fn from_json(json: &str) -> Result<Self, MarketMapError> {
        let market_map: MarketMap = serde_json::from_str(json)?;
        Ok(Self::from_market_map(market_map))
    }

    pub fn get(&self, ticker: &str) -> Option<&[ProviderConfig]> {
        self.markets.get(ticker).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::COINMARKETCAP_API;

    #[test]
    fn test_default_catalog_loads() {
        let btc = DEFAULT_REFERENCE_CATALOG.get("BTC/USD").unwrap();
        assert_eq!(btc, &[ProviderConfig::new(COINMARKETCAP_API, "1")]);

        let eth = DEFAULT_REFERENCE_CATALOG.get("ETH/USD").unwrap();
        assert_eq!(eth[0].off_chain_ticker, "1027");
    }

    #[test]
    fn test_default_catalog_is_reference_only() {
        assert!(!DEFAULT_REFERENCE_CATALOG.is_empty());
        assert!(DEFAULT_REFERENCE_CATALOG
            .markets
            .values()
            .flatten()
            .all(|p| p.name == COINMARKETCAP_API));
    }

    #[test]
    fn test_missing_ticker() {
        assert!(DEFAULT_REFERENCE_CATALOG.get("NOPE/USD").is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ReferenceCatalog::from_json("not json"),
            Err(MarketMapError::Catalog(_))
        ));
    }
}

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::currency_pair::CurrencyPair;
use crate::errors::ValidationError;

/// Upper bound on ticker precision.
pub const MAX_DECIMALS: u64 = 36;

/// Ticker metadata for a market.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(flatten)]
    pub currency_pair: CurrencyPair,

    /// Number of decimals prices for this ticker are scaled by.
    pub decimals: u64,

    /// Minimum number of providers required for a valid price (quorum).
    pub min_provider_count: u64,

    #[serde(default)]
    pub enabled: bool,

    /// Opaque JSON document; for perpx a [`PerpxTickerMetadata`](super::PerpxTickerMetadata).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata_json: String,
}

impl Ticker {
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        self.currency_pair.validate_basic()?;

        if self.decimals == 0 || self.decimals > MAX_DECIMALS {
            return Err(ValidationError::Decimals {
                ticker: self.to_string(),
                decimals: self.decimals,
                max: MAX_DECIMALS,
            });
        }

        if self.min_provider_count == 0 {
            return Err(ValidationError::ZeroMinProviderCount {
                ticker: self.to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.currency_pair, f)
    }
}

/// Binding from a canonical provider to its venue-specific symbol.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub off_chain_ticker: String,

    /// Market whose price this provider's price is divided by (e.g. USDT/USD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_by_pair: Option<CurrencyPair>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert: bool,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, off_chain_ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            off_chain_ticker: off_chain_ticker.into(),
            normalize_by_pair: None,
            invert: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub ticker: Ticker,
    #[serde(default)]
    pub provider_configs: Vec<ProviderConfig>,
}

impl Market {
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        self.ticker.validate_basic()?;

        let ticker = self.ticker.to_string();
        if (self.provider_configs.len() as u64) < self.ticker.min_provider_count {
            return Err(ValidationError::InsufficientProviders {
                ticker,
                have: self.provider_configs.len(),
                need: self.ticker.min_provider_count,
            });
        }

        let mut seen = HashSet::with_capacity(self.provider_configs.len());
        for provider in &self.provider_configs {
            if provider.name.is_empty() {
                return Err(ValidationError::EmptyProviderName { ticker });
            }
            if provider.off_chain_ticker.is_empty() {
                return Err(ValidationError::EmptyOffChainTicker {
                    ticker,
                    provider: provider.name.clone(),
                });
            }
            if let Some(pair) = &provider.normalize_by_pair {
                pair.validate_basic()?;
            }
            if !seen.insert((&provider.name, &provider.off_chain_ticker)) {
                return Err(ValidationError::DuplicateProvider {
                    ticker,
                    provider: provider.name.clone(),
                    off_chain_ticker: provider.off_chain_ticker.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Canonical set of markets keyed by `BASE/QUOTE`.
///
/// Ordered so that logs, serialization and merges are deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarketMap {
    #[serde(default)]
    pub markets: BTreeMap<String, Market>,
}

impl MarketMap {
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Insert a market under its own ticker string.
    pub fn insert(&mut self, market: Market) -> Option<Market> {
        self.markets.insert(market.ticker.to_string(), market)
    }

    /// Structural validation of every market and of cross-market references.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        for (key, market) in &self.markets {
            market.validate_basic()?;

            let ticker = market.ticker.to_string();
            if *key != ticker {
                return Err(ValidationError::KeyMismatch {
                    key: key.clone(),
                    ticker,
                });
            }

            for pair in market
                .provider_configs
                .iter()
                .filter_map(|p| p.normalize_by_pair.as_ref())
            {
                if !self.markets.contains_key(&pair.to_string()) {
                    return Err(ValidationError::MissingNormalizeMarket {
                        ticker,
                        pair: pair.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<Market> for MarketMap {
    fn from_iter<I: IntoIterator<Item = Market>>(iter: I) -> Self {
        let mut market_map = MarketMap::default();
        for market in iter {
            market_map.insert(market);
        }
        market_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(base: &str, quote: &str, min_provider_count: u64, providers: &[(&str, &str)]) -> Market {
        Market {
            ticker: Ticker {
                currency_pair: CurrencyPair::new(base, quote),
                decimals: 8,
                min_provider_count,
                enabled: true,
                metadata_json: String::new(),
            },
            provider_configs: providers
                .iter()
                .map(|(name, ticker)| ProviderConfig::new(*name, *ticker))
                .collect(),
        }
    }

    #[test]
    fn test_valid_market_map() {
        let market_map: MarketMap = vec![
            market("BTC", "USD", 2, &[("binance_ws", "BTCUSDT"), ("coinbase_ws", "BTC-USD")]),
            market("ETH", "USD", 1, &[("okx_ws", "ETH-USDT")]),
        ]
        .into_iter()
        .collect();

        assert!(market_map.validate_basic().is_ok());
        assert_eq!(market_map.len(), 2);
    }

    #[test]
    fn test_empty_market_fails() {
        let mut market_map = MarketMap::default();
        market_map.markets.insert(
            "BTC/USD".to_string(),
            market("", "", 1, &[("binance_ws", "BTCUSDT")]),
        );
        assert!(matches!(
            market_map.validate_basic(),
            Err(ValidationError::InvalidAsset { .. })
        ));
    }

    #[test]
    fn test_decimals_bounds() {
        let mut m = market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT")]);
        m.ticker.decimals = 0;
        assert!(matches!(m.validate_basic(), Err(ValidationError::Decimals { .. })));

        m.ticker.decimals = MAX_DECIMALS + 1;
        assert!(matches!(m.validate_basic(), Err(ValidationError::Decimals { .. })));

        m.ticker.decimals = MAX_DECIMALS;
        assert!(m.validate_basic().is_ok());
    }

    #[test]
    fn test_quorum_requires_enough_providers() {
        let m = market("BTC", "USD", 3, &[("binance_ws", "BTCUSDT")]);
        assert_eq!(
            m.validate_basic(),
            Err(ValidationError::InsufficientProviders {
                ticker: "BTC/USD".to_string(),
                have: 1,
                need: 3,
            })
        );

        let m = market("BTC", "USD", 0, &[("binance_ws", "BTCUSDT")]);
        assert!(matches!(
            m.validate_basic(),
            Err(ValidationError::ZeroMinProviderCount { .. })
        ));
    }

    #[test]
    fn test_provider_checks() {
        let m = market("BTC", "USD", 1, &[("", "BTCUSDT")]);
        assert!(matches!(m.validate_basic(), Err(ValidationError::EmptyProviderName { .. })));

        let m = market("BTC", "USD", 1, &[("binance_ws", "")]);
        assert!(matches!(m.validate_basic(), Err(ValidationError::EmptyOffChainTicker { .. })));

        let m = market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT"), ("binance_ws", "BTCUSDT")]);
        assert!(matches!(m.validate_basic(), Err(ValidationError::DuplicateProvider { .. })));
    }

    #[test]
    fn test_key_must_match_ticker() {
        let mut market_map = MarketMap::default();
        market_map.markets.insert(
            "ETH/USD".to_string(),
            market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT")]),
        );
        assert!(matches!(
            market_map.validate_basic(),
            Err(ValidationError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_normalize_by_pair_must_exist() {
        let mut btc = market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT")]);
        btc.provider_configs[0].normalize_by_pair = Some(CurrencyPair::new("USDT", "USD"));

        let mut market_map: MarketMap = vec![btc].into_iter().collect();
        assert!(matches!(
            market_map.validate_basic(),
            Err(ValidationError::MissingNormalizeMarket { .. })
        ));

        market_map.insert(market("USDT", "USD", 1, &[("kraken_api", "USDTZUSD")]));
        assert!(market_map.validate_basic().is_ok());
    }

    #[test]
    fn test_market_serializes_flat_ticker() {
        let m = market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT")]);
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ticker": {
                    "base": "BTC",
                    "quote": "USD",
                    "decimals": 8,
                    "min_provider_count": 1,
                    "enabled": true
                },
                "provider_configs": [
                    {"name": "binance_ws", "off_chain_ticker": "BTCUSDT"}
                ]
            })
        );
    }

    #[test]
    fn test_ticker_metadata_json_is_carried() {
        let mut m = market("BTC", "USD", 1, &[("binance_ws", "BTCUSDT")]);
        m.ticker.metadata_json = r#"{"reference_price":0,"liquidity":0,"aggregate_ids":[]}"#.to_string();

        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["ticker"]["metadata_json"], m.ticker.metadata_json);

        let decoded: Market = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, m);
    }
}

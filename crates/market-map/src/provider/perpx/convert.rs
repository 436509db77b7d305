//! MarketParam → MarketMap conversion shared by the perpx handlers.

use log::debug;

use super::models::{ExchangeConfigJson, MarketParam};
use crate::errors::ConversionError;
use crate::models::{CurrencyPair, Market, MarketMap, ProviderConfig, Ticker};
use crate::resolver::{normalize_venue_ticker, ProviderNameTable};

/// Convert a batch of market params into a market map.
///
/// Fails on the first bad param; a partially converted map is never returned.
pub fn market_params_to_market_map(
    params: &[MarketParam],
    names: &ProviderNameTable,
) -> Result<MarketMap, ConversionError> {
    let mut market_map = MarketMap::default();

    for param in params {
        let ticker = ticker_from_market_param(param)?;

        let exchange_config: ExchangeConfigJson =
            serde_json::from_str(&param.exchange_config_json).map_err(|e| {
                ConversionError::ExchangeConfig {
                    pair: param.pair.clone(),
                    message: e.to_string(),
                }
            })?;
        let provider_configs = provider_configs_from_exchange_config(&exchange_config, names)?;

        market_map.insert(Market {
            ticker,
            provider_configs,
        });
    }

    Ok(market_map)
}

/// Build the ticker for a market param.
///
/// Decimals are the negated exponent, so positive exponents are rejected.
pub fn ticker_from_market_param(param: &MarketParam) -> Result<Ticker, ConversionError> {
    let currency_pair = CurrencyPair::from_dash_pair(&param.pair)?;

    if param.exponent > 0 {
        return Err(ConversionError::PositiveExponent {
            pair: param.pair.clone(),
            exponent: param.exponent,
        });
    }

    Ok(Ticker {
        currency_pair,
        decimals: u64::from(param.exponent.unsigned_abs()),
        min_provider_count: u64::from(param.min_exchanges),
        enabled: true,
        metadata_json: String::new(),
    })
}

/// Expand exchange listings into canonical provider configs.
///
/// Exchanges missing from the name table are skipped.
pub fn provider_configs_from_exchange_config(
    config: &ExchangeConfigJson,
    names: &ProviderNameTable,
) -> Result<Vec<ProviderConfig>, ConversionError> {
    let mut provider_configs = Vec::with_capacity(config.exchanges.len());

    for exchange in &config.exchanges {
        let Some(providers) = names.lookup(&exchange.exchange_name) else {
            debug!(
                "Skipping unsupported exchange '{}' for ticker '{}'",
                exchange.exchange_name, exchange.ticker
            );
            continue;
        };

        let normalize_by_pair = exchange
            .adjust_by_market
            .as_deref()
            .filter(|market| !market.is_empty())
            .map(CurrencyPair::from_dash_pair)
            .transpose()?;

        for provider in providers {
            provider_configs.push(ProviderConfig {
                name: provider.clone(),
                off_chain_ticker: normalize_venue_ticker(provider, &exchange.ticker),
                normalize_by_pair: normalize_by_pair.clone(),
                invert: exchange.invert,
            });
        }
    }

    Ok(provider_configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::perpx::models::ExchangeMarketConfigJson;
    use crate::resolver::{BINANCE_WS, KRAKEN_API, MEXC_WS};

    fn param(pair: &str, exponent: i32, exchanges: Vec<ExchangeMarketConfigJson>) -> MarketParam {
        MarketParam {
            id: 0,
            pair: pair.to_string(),
            exponent,
            min_exchanges: 1,
            min_price_change_ppm: 1000,
            exchange_config_json: serde_json::to_string(&ExchangeConfigJson { exchanges }).unwrap(),
        }
    }

    #[test]
    fn test_ticker_from_market_param() {
        let ticker = ticker_from_market_param(&param("BTC-USD", -5, vec![])).unwrap();
        assert_eq!(ticker.currency_pair, CurrencyPair::new("BTC", "USD"));
        assert_eq!(ticker.decimals, 5);
        assert_eq!(ticker.min_provider_count, 1);
        assert!(ticker.enabled);
    }

    #[test]
    fn test_positive_exponent_is_rejected() {
        let err = ticker_from_market_param(&param("BTC-USD", 2, vec![])).unwrap_err();
        assert!(matches!(err, ConversionError::PositiveExponent { exponent: 2, .. }));
    }

    #[test]
    fn test_bad_pair_is_rejected() {
        let err = ticker_from_market_param(&param("BTCUSD", -5, vec![])).unwrap_err();
        assert_eq!(err, ConversionError::InvalidPair("BTCUSD".to_string()));
    }

    #[test]
    fn test_provider_names_and_tickers_are_canonicalized() {
        let names = ProviderNameTable::new();
        let config = ExchangeConfigJson {
            exchanges: vec![
                ExchangeMarketConfigJson::new("Binance", "1INCHUSDT"),
                ExchangeMarketConfigJson::new("Mexc", "1INCH_USDT"),
                ExchangeMarketConfigJson::new("UniswapV3-Ethereum", "1INCH-USDC"),
            ],
        };

        let providers = provider_configs_from_exchange_config(&config, &names).unwrap();
        assert_eq!(
            providers,
            vec![
                ProviderConfig::new(BINANCE_WS, "1INCHUSDT"),
                ProviderConfig::new(MEXC_WS, "1INCHUSDT"),
            ]
        );
    }

    #[test]
    fn test_adjust_by_market_and_invert() {
        let names = ProviderNameTable::new();
        let mut exchange = ExchangeMarketConfigJson::new("Kraken", "XXBTZUSD");
        exchange.adjust_by_market = Some("usdt-usd".to_string());
        exchange.invert = true;

        let providers = provider_configs_from_exchange_config(
            &ExchangeConfigJson {
                exchanges: vec![exchange],
            },
            &names,
        )
        .unwrap();

        assert_eq!(providers[0].name, KRAKEN_API);
        assert_eq!(providers[0].normalize_by_pair, Some(CurrencyPair::new("USDT", "USD")));
        assert!(providers[0].invert);
    }

    #[test]
    fn test_bad_adjust_by_market_is_rejected() {
        let names = ProviderNameTable::new();
        let mut exchange = ExchangeMarketConfigJson::new("Kraken", "XXBTZUSD");
        exchange.adjust_by_market = Some("USDT".to_string());

        let result = provider_configs_from_exchange_config(
            &ExchangeConfigJson {
                exchanges: vec![exchange],
            },
            &names,
        );
        assert_eq!(result, Err(ConversionError::InvalidPair("USDT".to_string())));
    }

    #[test]
    fn test_market_params_to_market_map() {
        let names = ProviderNameTable::new();
        let params = vec![
            param("BTC-USD", -5, vec![ExchangeMarketConfigJson::new("Binance", "BTCUSDT")]),
            param("ETH-USD", -6, vec![ExchangeMarketConfigJson::new("Kraken", "XETHZUSD")]),
        ];

        let market_map = market_params_to_market_map(&params, &names).unwrap();
        assert_eq!(market_map.len(), 2);
        assert_eq!(market_map.markets["ETH/USD"].ticker.decimals, 6);
        assert_eq!(
            market_map.markets["BTC/USD"].provider_configs,
            vec![ProviderConfig::new(BINANCE_WS, "BTCUSDT")]
        );
        assert!(market_map.validate_basic().is_ok());
    }

    #[test]
    fn test_undecodable_exchange_config_aborts_batch() {
        let names = ProviderNameTable::new();
        let mut bad = param("ETH-USD", -6, vec![]);
        bad.exchange_config_json = "{not json".to_string();
        let params = vec![param("BTC-USD", -5, vec![]), bad];

        let err = market_params_to_market_map(&params, &names).unwrap_err();
        assert!(matches!(err, ConversionError::ExchangeConfig { .. }));
    }
}

use tracing::debug;

use crate::models::MarketMap;

/// Merge `secondary` into `primary`.
///
/// Markets only the secondary knows are added unchanged. When both carry a
/// ticker the primary's market is kept as is; there is no field-level merge.
pub fn merge_market_maps(mut primary: MarketMap, secondary: MarketMap) -> MarketMap {
    for (ticker, market) in secondary.markets {
        if primary.markets.contains_key(&ticker) {
            continue;
        }
        debug!(ticker = %ticker, "adding market from secondary source");
        primary.markets.insert(ticker, market);
    }
    primary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrencyPair, Market, ProviderConfig, Ticker};

    fn market(base: &str, providers: &[(&str, &str)]) -> Market {
        Market {
            ticker: Ticker {
                currency_pair: CurrencyPair::new(base, "USD"),
                decimals: 8,
                min_provider_count: 1,
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
    fn test_disjoint_maps_are_unioned() {
        let primary: MarketMap = [market("BTC", &[("binance_ws", "BTCUSDT")])].into_iter().collect();
        let secondary: MarketMap = [market("ETH", &[("okx_ws", "ETH-USDT")])].into_iter().collect();

        let merged = merge_market_maps(primary, secondary);
        assert_eq!(
            merged.markets.keys().collect::<Vec<_>>(),
            vec!["BTC/USD", "ETH/USD"]
        );
    }

    #[test]
    fn test_primary_wins_shared_tickers() {
        let primary_btc = market("BTC", &[("binance_ws", "BTCUSDT")]);
        let secondary_btc = market("BTC", &[("okx_ws", "BTC-USDT"), ("kraken_api", "XXBTZUSD")]);

        let merged = merge_market_maps(
            [primary_btc.clone()].into_iter().collect(),
            [secondary_btc].into_iter().collect(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.markets["BTC/USD"], primary_btc);
    }

    #[test]
    fn test_empty_sides() {
        let btc: MarketMap = [market("BTC", &[("binance_ws", "BTCUSDT")])].into_iter().collect();

        assert_eq!(merge_market_maps(MarketMap::default(), btc.clone()), btc);
        assert_eq!(merge_market_maps(btc.clone(), MarketMap::default()), btc);
    }
}

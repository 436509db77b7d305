//! Wire types for the perpx canonical feed and research document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Research document: vendor asset symbol → research record.
pub type ResearchJson = BTreeMap<String, ResearchRecord>;

/// One asset's entry in the research document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub id: u32,

    /// `BASE-QUOTE`, e.g. `1INCH-USD`.
    pub pair: String,

    /// Fractional on the wire; truncated to an integer when converted.
    pub exponent: f64,

    pub min_price_change_ppm: u32,

    pub min_exchanges: u32,

    #[serde(default)]
    pub exchanges: Vec<ExchangeMarketConfigJson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResearchMetadata>,
}

impl ResearchRecord {
    /// CoinMarketCap id, when the record carries one.
    pub fn cmc_id(&self) -> Option<i64> {
        self.metadata.as_ref().and_then(|m| m.cmc_id)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResearchMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmc_id: Option<i64>,
}

/// One exchange listing for a market.
///
/// Serialized with the chain's camelCase keys because it is embedded in
/// [`MarketParam::exchange_config_json`]; the research document's snake_case
/// keys are accepted on input.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExchangeMarketConfigJson {
    #[serde(rename = "exchangeName", alias = "exchange_name")]
    pub exchange_name: String,

    pub ticker: String,

    /// Market (`BASE-QUOTE`) this exchange's price is adjusted by.
    #[serde(
        rename = "adjustByMarket",
        alias = "adjust_by_market",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adjust_by_market: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert: bool,
}

impl ExchangeMarketConfigJson {
    pub fn new(exchange_name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            ticker: ticker.into(),
            adjust_by_market: None,
            invert: false,
        }
    }
}

/// The document embedded as a string inside a [`MarketParam`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExchangeConfigJson {
    pub exchanges: Vec<ExchangeMarketConfigJson>,
}

/// Canonical market parameters as published by the chain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarketParam {
    pub id: u32,
    pub pair: String,
    pub exponent: i32,
    pub min_exchanges: u32,
    pub min_price_change_ppm: u32,

    /// Serialized [`ExchangeConfigJson`]. Kept as a string because that is
    /// the chain's wire shape.
    pub exchange_config_json: String,
}

/// Response of the chain's market-params query.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryAllMarketParamsResponse {
    #[serde(default)]
    pub market_params: Vec<MarketParam>,
}

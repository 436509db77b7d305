use serde::{Deserialize, Deserializer, Serialize};

/// Venue name used for CoinMarketCap aggregator ids.
pub const COINMARKETCAP_VENUE: &str = "coinmarketcap";

/// An id under which an external aggregator indexes a ticker.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AggregatorId {
    pub venue: String,
    #[serde(rename = "ID")]
    pub id: String,
}

impl AggregatorId {
    pub fn new(venue: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            id: id.into(),
        }
    }
}

/// Document stored in [`Ticker::metadata_json`](super::Ticker::metadata_json)
/// for perpx markets.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PerpxTickerMetadata {
    /// Spot price at the last metadata update, scaled by the ticker's
    /// decimals. Updated infrequently.
    pub reference_price: u64,

    /// Rough USD liquidity across the market's providers.
    pub liquidity: u64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub aggregate_ids: Vec<AggregatorId>,

    /// Launch as a cross-margin market instead of isolated margin.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cross_launch: bool,
}

impl PerpxTickerMetadata {
    pub fn new(
        reference_price: u64,
        liquidity: u64,
        aggregate_ids: Vec<AggregatorId>,
        cross_launch: bool,
    ) -> Self {
        Self {
            reference_price,
            liquidity,
            aggregate_ids,
            cross_launch,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_bytes(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }

    /// CoinMarketCap id among the aggregate ids, if any.
    pub fn coinmarketcap_id(&self) -> Option<&str> {
        self.aggregate_ids
            .iter()
            .find(|a| a.venue == COINMARKETCAP_VENUE)
            .map(|a| a.id.as_str())
    }
}

// Other writers encode an empty id list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AggregatorId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<AggregatorId>>::deserialize(deserializer)?.unwrap_or_default())
}

//! Research document translator.
//!
//! Turns the perpx research JSON (vendor asset symbol → research record) into a
//! market map in two stages: research records become [`MarketParam`]s, which
//! then go through the same conversion as the canonical feed. The record's
//! CoinMarketCap id survives as the ticker's metadata document.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use super::convert::market_params_to_market_map;
use super::models::{
    ExchangeConfigJson, ExchangeMarketConfigJson, MarketParam, ResearchJson, ResearchRecord,
};
use super::{chain, RESEARCH_API_HANDLER_NAME, RESEARCH_CMC_API_HANDLER_NAME};
use crate::config::ApiConfig;
use crate::errors::{ConversionError, FetchError, MarketMapError};
use crate::fetcher::MarketMapApiHandler;
use crate::models::{
    AggregatorId, Chain, CurrencyPair, FetchResponse, MarketMap, MarketMapResponse,
    PerpxTickerMetadata, COINMARKETCAP_VENUE,
};
use crate::resolver::{ProviderNameTable, COINMARKETCAP_API, DEFAULT_PROVIDER_NAMES};

/// Which provider list a research record is translated into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResearchMode {
    /// Keep the record's own exchange listings.
    Full,
    /// Only records with a CoinMarketCap id, each priced by CoinMarketCap alone.
    ReferenceOnly,
}

/// Api handler for the research document.
#[derive(Debug)]
pub struct ResearchApiHandler {
    name: String,
    url: String,
    mode: ResearchMode,
    names: Arc<ProviderNameTable>,
}

impl ResearchApiHandler {
    /// Build a handler from a research api config.
    ///
    /// The config carries two endpoints: the chain's REST endpoint first and
    /// the research document second. The `_cmc` config name selects
    /// [`ResearchMode::ReferenceOnly`].
    pub fn new(api: &ApiConfig) -> Result<Self, MarketMapError> {
        let mode = match api.name.as_str() {
            RESEARCH_API_HANDLER_NAME => ResearchMode::Full,
            RESEARCH_CMC_API_HANDLER_NAME => ResearchMode::ReferenceOnly,
            other => {
                return Err(MarketMapError::UnexpectedName {
                    expected: format!("{RESEARCH_API_HANDLER_NAME} or {RESEARCH_CMC_API_HANDLER_NAME}"),
                    actual: other.to_string(),
                })
            }
        };

        api.ensure_usable()?;
        api.expect_endpoints(2)?;

        Ok(Self {
            name: api.name.clone(),
            url: api.endpoints[1].url.clone(),
            mode,
            names: Arc::clone(&DEFAULT_PROVIDER_NAMES),
        })
    }

    /// Replace the vendor exchange name table.
    pub fn with_provider_names(mut self, names: Arc<ProviderNameTable>) -> Self {
        self.names = names;
        self
    }

    pub fn mode(&self) -> ResearchMode {
        self.mode
    }

    /// First stage: research records → canonical market params.
    ///
    /// In reference-only mode records without a non-negative CoinMarketCap id
    /// are left out.
    pub fn research_to_market_params(
        &self,
        research: &ResearchJson,
    ) -> Result<Vec<MarketParam>, ConversionError> {
        let mut params = Vec::with_capacity(research.len());

        for (symbol, record) in research {
            let reference_id = match self.mode {
                ResearchMode::Full => None,
                ResearchMode::ReferenceOnly => match record.cmc_id() {
                    Some(id) if id >= 0 => Some(id),
                    _ => {
                        debug!(symbol = %symbol, pair = %record.pair, "skipping record without a cmc id");
                        continue;
                    }
                },
            };

            params.push(market_param_from_record(record, reference_id)?);
        }

        Ok(params)
    }

    /// Second stage: convert the params and attach each record's metadata
    /// to its ticker.
    pub fn research_to_market_map(
        &self,
        research: &ResearchJson,
    ) -> Result<MarketMap, ConversionError> {
        let params = self.research_to_market_params(research)?;
        let mut market_map = market_params_to_market_map(&params, &self.names)?;
        attach_ticker_metadata(research, &mut market_map)?;
        Ok(market_map)
    }
}

/// Store a [`PerpxTickerMetadata`] carrying the CoinMarketCap id on every
/// market that came from a record with one. Records left out of the map are
/// ignored.
fn attach_ticker_metadata(
    research: &ResearchJson,
    market_map: &mut MarketMap,
) -> Result<(), ConversionError> {
    for record in research.values() {
        let Some(cmc_id) = record.cmc_id().filter(|id| *id >= 0) else {
            continue;
        };

        let ticker = CurrencyPair::from_dash_pair(&record.pair)?.to_string();
        let Some(market) = market_map.markets.get_mut(&ticker) else {
            continue;
        };

        let metadata = PerpxTickerMetadata::new(
            0,
            0,
            vec![AggregatorId::new(COINMARKETCAP_VENUE, cmc_id.to_string())],
            false,
        );
        let metadata_json = metadata.to_json().map_err(|e| ConversionError::TickerMetadata {
            pair: record.pair.clone(),
            message: e.to_string(),
        })?;
        market.ticker.metadata_json = metadata_json;
    }

    Ok(())
}

/// Convert one research record. A `reference_id` replaces the record's
/// exchange listings with a single CoinMarketCap listing and a quorum of one.
fn market_param_from_record(
    record: &ResearchRecord,
    reference_id: Option<i64>,
) -> Result<MarketParam, ConversionError> {
    let (exchanges, min_exchanges) = match reference_id {
        Some(id) => (
            vec![ExchangeMarketConfigJson::new(COINMARKETCAP_API, id.to_string())],
            1,
        ),
        None => (record.exchanges.clone(), record.min_exchanges),
    };

    let exchange_config_json = serde_json::to_string(&ExchangeConfigJson { exchanges }).map_err(
        |e| ConversionError::ExchangeConfig {
            pair: record.pair.clone(),
            message: e.to_string(),
        },
    )?;

    Ok(MarketParam {
        id: record.id,
        pair: record.pair.clone(),
        // Truncates toward zero.
        exponent: record.exponent as i32,
        min_exchanges,
        min_price_change_ppm: record.min_price_change_ppm,
        exchange_config_json,
    })
}

impl MarketMapApiHandler for ResearchApiHandler {
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
        Ok(self.url.clone())
    }

    fn parse_response(&self, chains: &[Chain], body: &[u8]) -> MarketMapResponse {
        let perpx = chain();
        if !chains.contains(&perpx) {
            error!(handler = %self.name, "perpx chain is not part of the request");
            return FetchResponse::with_err(
                chains,
                FetchError::invalid_scope(format!("expected {perpx} in {} chains", chains.len())),
            );
        }

        let research: ResearchJson = match serde_json::from_slice(body) {
            Ok(research) => research,
            Err(e) => {
                error!(handler = %self.name, error = %e, "failed to decode research document");
                return FetchResponse::with_err(
                    chains,
                    FetchError::decode(format!("failed to decode research document: {e}")),
                );
            }
        };

        let market_map = match self.research_to_market_map(&research) {
            Ok(market_map) => market_map,
            Err(e) => {
                error!(handler = %self.name, error = %e, "failed to convert research document");
                return FetchResponse::with_err(chains, e.into());
            }
        };

        debug!(
            handler = %self.name,
            markets = market_map.len(),
            "resolved research document into a market map"
        );

        let mut response = FetchResponse::with_resolved(perpx, market_map, Utc::now());
        let name = &self.name;
        response.fill_missing(chains, |chain| {
            FetchError::invalid_scope(format!("chain {chain} is not served by {name}"))
        });
        response
    }
}

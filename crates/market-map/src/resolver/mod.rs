//! Static lookup tables used while translating and filtering market maps.
//!
//! Both tables are immutable once built. Fetchers receive them as
//! `Arc`s so tests and deployments can inject their own.
//!
//! - [`ProviderNameTable`]: vendor exchange name → canonical provider names
//! - [`ReferenceCatalog`]: ticker → reference-source provider configs

mod provider_names;
mod reference_catalog;

pub use provider_names::{
    normalize_venue_ticker, ProviderNameTable, BINANCE_WS, BITFINEX_WS, BITSTAMP_WS, BYBIT_WS,
    COINBASE_WS, COINMARKETCAP_API, CRYPTO_DOT_COM_WS, DEFAULT_PROVIDER_NAMES, GATE_WS, HUOBI_WS,
    KRAKEN_API, KUCOIN_WS, MEXC_WS, OKX_WS, VOLATILE_EXCHANGE,
};
pub use reference_catalog::{ReferenceCatalog, DEFAULT_REFERENCE_CATALOG};

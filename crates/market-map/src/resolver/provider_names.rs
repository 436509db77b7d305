//! Vendor exchange name to canonical provider name mappings.
//!
//! The research document and the canonical feed name exchanges the way the
//! perpx chain does ("Binance", "CoinbasePro", ...). The oracle identifies
//! providers by their canonical names ("binance_ws", "coinbase_ws", ...).

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

pub const BINANCE_WS: &str = "binance_ws";
pub const BITFINEX_WS: &str = "bitfinex_ws";
pub const BITSTAMP_WS: &str = "bitstamp_ws";
pub const BYBIT_WS: &str = "bybit_ws";
pub const COINBASE_WS: &str = "coinbase_ws";
pub const CRYPTO_DOT_COM_WS: &str = "crypto_dot_com_ws";
pub const GATE_WS: &str = "gate_ws";
pub const HUOBI_WS: &str = "huobi_ws";
pub const KRAKEN_API: &str = "kraken_api";
pub const KUCOIN_WS: &str = "kucoin_ws";
pub const MEXC_WS: &str = "mexc_ws";
pub const OKX_WS: &str = "okx_ws";
pub const VOLATILE_EXCHANGE: &str = "volatile-exchange-provider";

/// Reference source used by reference-only translation and filtering.
pub const COINMARKETCAP_API: &str = "coinmarketcap_api";

lazy_static! {
    /// Process-wide default table, built once.
    pub static ref DEFAULT_PROVIDER_NAMES: Arc<ProviderNameTable> =
        Arc::new(ProviderNameTable::new());
}

/// Read-only vendor exchange name → canonical provider names table.
///
/// One vendor exchange may feed several canonical providers.
#[derive(Clone, Debug)]
pub struct ProviderNameTable {
    mappings: HashMap<String, Vec<String>>,
}

impl Default for ProviderNameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderNameTable {
    /// Create a table with the default perpx mappings.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.load_defaults();
        table
    }

    pub fn empty() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    fn load_defaults(&mut self) {
        // Centralized exchanges
        self.add("Binance", &[BINANCE_WS]);
        self.add("Bitfinex", &[BITFINEX_WS]);
        self.add("Bitstamp", &[BITSTAMP_WS]);
        self.add("Bybit", &[BYBIT_WS]);
        self.add("CoinbasePro", &[COINBASE_WS]);
        self.add("CryptoCom", &[CRYPTO_DOT_COM_WS]);
        self.add("Gate", &[GATE_WS]);
        self.add("Huobi", &[HUOBI_WS]);
        self.add("Kraken", &[KRAKEN_API]);
        self.add("Kucoin", &[KUCOIN_WS]);
        self.add("Mexc", &[MEXC_WS]);
        self.add("Okx", &[OKX_WS]);

        // Test-only exchange used on staging networks
        self.add("TestVolatileExchange", &[VOLATILE_EXCHANGE]);

        // Reference-only translation emits the canonical name directly
        self.add(COINMARKETCAP_API, &[COINMARKETCAP_API]);
    }

    /// Add or replace the mapping for a vendor exchange name.
    pub fn add(&mut self, vendor_name: &str, providers: &[&str]) {
        self.mappings.insert(
            vendor_name.to_string(),
            providers.iter().map(|p| p.to_string()).collect(),
        );
    }

    /// Canonical providers for a vendor exchange name, if it is known.
    pub fn lookup(&self, vendor_name: &str) -> Option<&[String]> {
        self.mappings.get(vendor_name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Rewrite a vendor ticker into the symbol the given provider expects.
///
/// MEXC symbols drop the underscore (`1INCH_USDT` → `1INCHUSDT`); every other
/// provider takes the vendor ticker as-is.
pub fn normalize_venue_ticker(provider: &str, ticker: &str) -> String {
    match provider {
        MEXC_WS => ticker.replace('_', ""),
        _ => ticker.to_string(),
    }
}

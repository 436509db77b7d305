//! Error types for the market-map crate.
//!
//! This module provides:
//! - [`ErrorCode`]: the classification carried by every unresolved result
//! - [`FetchError`]: the coded value stored inside an unresolved result
//! - [`ConversionError`]: per-record failures while translating vendor documents
//! - [`ValidationError`]: structural failures of a market map
//! - [`MarketMapError`]: construction-time failures (config, factory wiring)
//!
//! Fetch paths never return `Result`; their failures are folded into a
//! [`FetchResponse`](crate::models::FetchResponse) as [`FetchError`] values.

mod code;

pub use code::ErrorCode;

use thiserror::Error;

/// A classified fetch failure.
///
/// Cloneable so a single failure can be attached to every requested key.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("{code}: {message}")]
pub struct FetchError {
    pub code: ErrorCode,
    pub message: String,
}

impl FetchError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamGeneral, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeFailure, message)
    }

    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidScope, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailure, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

/// Failure converting a single vendor or canonical record.
///
/// Any of these aborts the whole batch it occurred in.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ConversionError {
    /// The pair string is not of the form `BASE-QUOTE`.
    #[error("invalid currency pair: {0:?}")]
    InvalidPair(String),

    /// Canonical exponents are non-positive; decimals are their negation.
    #[error("exponent {exponent} for {pair} must not be positive")]
    PositiveExponent { pair: String, exponent: i32 },

    /// The embedded exchange-config document could not be (de)serialized.
    #[error("exchange config for {pair}: {message}")]
    ExchangeConfig { pair: String, message: String },

    #[error("ticker metadata for {pair}: {message}")]
    TickerMetadata { pair: String, message: String },
}

impl From<ConversionError> for FetchError {
    fn from(err: ConversionError) -> Self {
        FetchError::decode(err.to_string())
    }
}

/// A structural invariant violated by a market map.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    #[error("currency pair {pair:?} has an empty or malformed asset")]
    InvalidAsset { pair: String },

    #[error("ticker {ticker} has {decimals} decimals, expected 1..={max}")]
    Decimals {
        ticker: String,
        decimals: u64,
        max: u64,
    },

    #[error("ticker {ticker} has a min provider count of zero")]
    ZeroMinProviderCount { ticker: String },

    #[error("market {ticker} has {have} providers but requires {need}")]
    InsufficientProviders { ticker: String, have: usize, need: u64 },

    #[error("market {ticker} has a provider with an empty name")]
    EmptyProviderName { ticker: String },

    #[error("provider {provider} for market {ticker} has an empty off-chain ticker")]
    EmptyOffChainTicker { ticker: String, provider: String },

    #[error("market {ticker} lists provider {provider} with ticker {off_chain_ticker} twice")]
    DuplicateProvider {
        ticker: String,
        provider: String,
        off_chain_ticker: String,
    },

    #[error("market stored under {key} has ticker {ticker}")]
    KeyMismatch { key: String, ticker: String },

    #[error("market {ticker} normalizes by {pair}, which is not in the market map")]
    MissingNormalizeMarket { ticker: String, pair: String },
}

impl From<ValidationError> for FetchError {
    fn from(err: ValidationError) -> Self {
        FetchError::validation(err.to_string())
    }
}

/// Errors raised while building fetchers from configuration.
#[derive(Error, Debug)]
pub enum MarketMapError {
    #[error("invalid api config {name}: {message}")]
    InvalidConfig { name: String, message: String },

    #[error("api config {0} is not enabled")]
    ApiDisabled(String),

    #[error("api config {name} expects {expected} endpoints, got {actual}")]
    EndpointCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected api config name {expected}, got {actual}")]
    UnexpectedName { expected: String, actual: String },

    #[error("unknown market-map provider: {0}")]
    UnknownProvider(String),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to decode reference catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

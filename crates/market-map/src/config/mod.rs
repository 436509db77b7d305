//! Provider and API configuration.
//!
//! Configs are plain serde structs; loading them from files or the
//! environment is the caller's concern. Durations are milliseconds on the wire.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::MarketMapError;

/// A URL a provider can be queried at.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// REST settings for one market-map provider.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub name: String,

    #[serde(default)]
    pub enabled: bool,

    /// Per-request timeout.
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,

    /// How often the polling layer should call the fetcher.
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,

    /// Maximum concurrent queries (and pooled connections) per host.
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

fn default_max_queries() -> usize {
    1
}

impl ApiConfig {
    pub fn validate_basic(&self) -> Result<(), MarketMapError> {
        let invalid = |message: &str| MarketMapError::InvalidConfig {
            name: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be positive"));
        }
        if self.interval.is_zero() {
            return Err(invalid("interval must be positive"));
        }
        if self.max_queries == 0 {
            return Err(invalid("max_queries must be positive"));
        }
        if self.endpoints.is_empty() {
            return Err(invalid("at least one endpoint is required"));
        }
        if self.endpoints.iter().any(|e| e.url.trim().is_empty()) {
            return Err(invalid("endpoint url must not be empty"));
        }

        Ok(())
    }

    /// Fail unless exactly `expected` endpoints are configured.
    pub fn expect_endpoints(&self, expected: usize) -> Result<(), MarketMapError> {
        if self.endpoints.len() != expected {
            return Err(MarketMapError::EndpointCount {
                name: self.name.clone(),
                expected,
                actual: self.endpoints.len(),
            });
        }
        Ok(())
    }

    /// Shared precondition of every fetcher constructor: enabled and valid.
    pub fn ensure_usable(&self) -> Result<(), MarketMapError> {
        if !self.enabled {
            return Err(MarketMapError::ApiDisabled(self.name.clone()));
        }
        self.validate_basic()
    }
}

/// Names which market-map fetcher to build and how to reach it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarketMapProviderConfig {
    pub name: String,
    pub api: ApiConfig,
}

impl MarketMapProviderConfig {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            name: api.name.clone(),
            api,
        }
    }

    pub fn validate_basic(&self) -> Result<(), MarketMapError> {
        if self.name != self.api.name {
            return Err(MarketMapError::UnexpectedName {
                expected: self.name.clone(),
                actual: self.api.name.clone(),
            });
        }
        self.api.validate_basic()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

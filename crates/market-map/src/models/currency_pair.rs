use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ConversionError, ValidationError};

/// Canonical trading-pair identity. Renders as `BASE/QUOTE`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Parse a vendor pair of the form `BASE-QUOTE` (e.g. `1INCH-USD`).
    ///
    /// Assets are upper-cased; anything other than exactly two non-empty
    /// parts is rejected.
    pub fn from_dash_pair(pair: &str) -> Result<Self, ConversionError> {
        let mut parts = pair.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base.to_uppercase(), quote.to_uppercase()))
            }
            _ => Err(ConversionError::InvalidPair(pair.to_string())),
        }
    }

    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        let valid_asset = |asset: &str| !asset.is_empty() && !asset.contains(['/', '-']);
        if valid_asset(&self.base) && valid_asset(&self.quote) {
            Ok(())
        } else {
            Err(ValidationError::InvalidAsset {
                pair: self.to_string(),
            })
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

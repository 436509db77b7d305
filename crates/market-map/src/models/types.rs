use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope key for market-map fetches: the chain whose market map is wanted.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: String,
}

impl Chain {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chain_id)
    }
}

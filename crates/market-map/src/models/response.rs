//! Partial result sets returned by every fetcher.
//!
//! A fetch never raises: each requested key lands in exactly one of
//! `resolved` or `unresolved`, and failures travel as coded [`FetchError`]s.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Utc};

use super::market::MarketMap;
use super::types::Chain;
use crate::errors::{ErrorCode, FetchError};

/// A successfully fetched value and the time it was observed.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedResult<V> {
    pub value: V,
    pub timestamp: DateTime<Utc>,
}

impl<V> ResolvedResult<V> {
    pub fn new(value: V, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// A failed key and the reason it failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnresolvedResult {
    pub error: FetchError,
}

impl UnresolvedResult {
    pub fn new(error: FetchError) -> Self {
        Self { error }
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code
    }
}

/// Per-key outcome of one fetch call.
#[derive(Clone, Debug)]
pub struct FetchResponse<K, V> {
    pub resolved: HashMap<K, ResolvedResult<V>>,
    pub unresolved: HashMap<K, UnresolvedResult>,
}

impl<K, V> Default for FetchResponse<K, V> {
    fn default() -> Self {
        Self {
            resolved: HashMap::new(),
            unresolved: HashMap::new(),
        }
    }
}

impl<K, V> FetchResponse<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(
        resolved: HashMap<K, ResolvedResult<V>>,
        unresolved: HashMap<K, UnresolvedResult>,
    ) -> Self {
        Self {
            resolved,
            unresolved,
        }
    }

    /// A response with a single resolved key.
    pub fn with_resolved(key: K, value: V, timestamp: DateTime<Utc>) -> Self {
        let mut response = Self::default();
        response.insert_resolved(key, ResolvedResult::new(value, timestamp));
        response
    }

    /// A fully-unresolved response: the same error for every requested key.
    pub fn with_err(keys: &[K], error: FetchError) -> Self {
        let unresolved = keys
            .iter()
            .map(|key| (key.clone(), UnresolvedResult::new(error.clone())))
            .collect();

        Self {
            resolved: HashMap::new(),
            unresolved,
        }
    }

    /// Record a success for `key`, replacing any earlier outcome.
    pub fn insert_resolved(&mut self, key: K, result: ResolvedResult<V>) {
        self.unresolved.remove(&key);
        self.resolved.insert(key, result);
    }

    /// Record a failure for `key`, replacing any earlier outcome.
    pub fn insert_unresolved(&mut self, key: K, error: FetchError) {
        self.resolved.remove(&key);
        self.unresolved.insert(key, UnresolvedResult::new(error));
    }

    /// Fold another response into this one; `other` wins on shared keys.
    pub fn combine(&mut self, other: FetchResponse<K, V>) {
        for (key, result) in other.resolved {
            self.insert_resolved(key, result);
        }
        for (key, result) in other.unresolved {
            self.insert_unresolved(key, result.error);
        }
    }

    /// Mark every requested key that has no outcome yet as unresolved.
    pub fn fill_missing<F>(&mut self, keys: &[K], error_for: F)
    where
        F: Fn(&K) -> FetchError,
    {
        for key in keys {
            if !self.resolved.contains_key(key) && !self.unresolved.contains_key(key) {
                self.unresolved
                    .insert(key.clone(), UnresolvedResult::new(error_for(key)));
            }
        }
    }

    /// True when resolved and unresolved partition exactly the requested keys.
    pub fn covers_exactly(&self, keys: &[K]) -> bool {
        let requested: HashSet<&K> = keys.iter().collect();
        let disjoint = self.resolved.keys().all(|k| !self.unresolved.contains_key(k));
        let reported = self.resolved.len() + self.unresolved.len();

        disjoint
            && reported == requested.len()
            && requested
                .iter()
                .all(|k| self.resolved.contains_key(*k) || self.unresolved.contains_key(*k))
    }

    pub fn resolved_value(&self, key: &K) -> Option<&V> {
        self.resolved.get(key).map(|r| &r.value)
    }

    pub fn unresolved_code(&self, key: &K) -> Option<ErrorCode> {
        self.unresolved.get(key).map(UnresolvedResult::code)
    }
}

/// Partial result set produced by market-map fetchers.
pub type MarketMapResponse = FetchResponse<Chain, MarketMap>;

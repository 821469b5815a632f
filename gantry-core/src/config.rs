//! Submission configuration
//!
//! An immutable mapping of string keys read by both the plan compiler and the
//! cluster provider. Values are set once through [`ConfigurationBuilder`];
//! nothing mutates a [`Configuration`] after it is built.

use std::collections::BTreeMap;
use std::str::FromStr;

/// Well-known configuration keys
pub mod keys {
    /// Identifier of the already-running cluster to submit to
    pub const CLUSTER_ID: &str = "cluster.id";

    /// Base URL of the cluster management endpoint
    pub const CLUSTER_ENDPOINT: &str = "cluster.endpoint";

    /// Timeout for management and submission requests, in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "cluster.request-timeout-secs";

    /// Parallelism applied to plan nodes that do not set their own
    pub const DEFAULT_PARALLELISM: &str = "job.default-parallelism";
}

/// Immutable configuration for one submission
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    /// Starts building a new configuration
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the raw value for `key`, if set
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key` parsed as `T`
    ///
    /// Missing keys and unparseable values both yield `None`; callers supply
    /// their own defaults.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse::<T>().ok())
    }

    /// Whether `key` is set
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`Configuration`]
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    entries: BTreeMap<String, String>,
}

impl ConfigurationBuilder {
    /// Sets a key/value pair, replacing any previous value
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Finalizes the configuration
    pub fn build(self) -> Configuration {
        Configuration {
            entries: self.entries,
        }
    }
}

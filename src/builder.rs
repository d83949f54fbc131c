//! Store builder for flexible configuration
//!
//! This module provides a builder pattern for assembling an [`EventStore`]
//! from a data source and cache settings.

use crate::config::{Config, FoldPolicy};
use crate::error::Result;
use crate::source::EventSource;
use crate::store::EventStore;

/// Builder for an [`EventStore`] over a given source.
#[derive(Debug)]
pub struct StoreBuilder<S> {
    source: S,
    config: Config,
}

impl<S: EventSource> StoreBuilder<S> {
    /// Create a new builder with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Maximum number of records requested per fetch.
    pub fn fetch_limit(mut self, limit: usize) -> Self {
        self.config.fetch_limit = limit;
        self
    }

    pub fn fold_policy(mut self, policy: FoldPolicy) -> Self {
        self.config.fold_policy = policy;
        self
    }

    /// Validate the configuration and build the store.
    pub fn build(self) -> Result<EventStore<S>> {
        EventStore::with_config(self.source, self.config)
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory response stores.
//!
//! This module provides a builder API for `InMemoryStore` that abstracts
//! the underlying moka configuration, providing a stable API surface
//! without exposing moka's types.

use std::time::Duration;

use crate::store::InMemoryStore;

/// Builder for configuring an `InMemoryStore`.
///
/// This builder provides a stable API for common store configuration
/// options without exposing the underlying moka cache implementation.
///
/// # Examples
///
/// ```
/// use cachetag_memory::InMemoryStore;
/// use std::time::Duration;
///
/// let store = InMemoryStore::builder()
///     .max_capacity(1000)
///     .time_to_live(Duration::from_secs(300))
///     .time_to_idle(Duration::from_secs(60))
///     .initial_capacity(100)
///     .name("storefront-responses")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) time_to_live: Option<Duration>,
    pub(crate) time_to_idle: Option<Duration>,
    pub(crate) name: Option<String>,
}

impl InMemoryStoreBuilder {
    /// Creates a new builder with default settings.
    ///
    /// The default configuration creates an unbounded store with `TinyLFU`
    /// eviction policy and no time-based expiration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum capacity of the store.
    ///
    /// Once the capacity is reached, entries will be evicted to make room
    /// for new entries using the `TinyLFU` eviction policy (combination of
    /// LRU eviction and LFU admission).
    ///
    /// If not set, the store will be unbounded (limited only by available memory).
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint) for the store.
    ///
    /// This can improve performance by avoiding reallocations during
    /// initial population. The store may still grow beyond this size.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets the time-to-live (TTL) for all entries.
    ///
    /// Entries will expire after this duration from insertion, regardless
    /// of access patterns. This is enforced inside the store and is
    /// independent of the engine-level expiry derived from entry metadata;
    /// when both are configured the shorter one wins in practice.
    ///
    /// Expired entries are removed lazily during store operations and
    /// automatically in the background using hierarchical timer wheels.
    #[must_use]
    pub fn time_to_live(mut self, duration: Duration) -> Self {
        self.time_to_live = Some(duration);
        self
    }

    /// Sets the time-to-idle (TTI) for all entries.
    ///
    /// Entries will expire after this duration of inactivity (no reads or
    /// writes). The timer is reset on each access.
    #[must_use]
    pub fn time_to_idle(mut self, duration: Duration) -> Self {
        self.time_to_idle = Some(duration);
        self
    }

    /// Sets a name for the store.
    ///
    /// This name may appear in logs or debugging output from the
    /// underlying cache implementation.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured `InMemoryStore`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_memory::InMemoryStore;
    /// use std::time::Duration;
    ///
    /// let store = InMemoryStore::builder()
    ///     .max_capacity(1000)
    ///     .time_to_live(Duration::from_secs(300))
    ///     .build();
    /// ```
    #[must_use]
    pub fn build(self) -> InMemoryStore {
        InMemoryStore::from_builder(&self)
    }
}

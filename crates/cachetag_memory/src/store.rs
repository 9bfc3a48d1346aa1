// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory response store implementation using moka.

use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, StoreError};
use moka::future::Cache;
use thread_aware::{Arc, PerProcess, ThreadAware};

use crate::builder::InMemoryStoreBuilder;

/// An in-memory response store backed by moka.
///
/// This store provides:
/// - Concurrent access with high performance
/// - Automatic eviction based on capacity
/// - Thread-safe operations
///
/// # Examples
///
/// ```
/// use cachetag_memory::InMemoryStore;
/// use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, TagSet};
/// # futures::executor::block_on(async {
///
/// let store = InMemoryStore::new();
/// let key = Fingerprint::new("nav:main");
///
/// store.put(&key, ResponseEntry::new("<nav/>", TagSet::new())).await?;
/// let entry = store.get(&key).await?;
/// assert_eq!(&entry.unwrap()[..], b"<nav/>");
/// # Ok::<(), cachetag_store::StoreError>(())
/// # });
/// ```
#[derive(Debug, Clone, ThreadAware)]
pub struct InMemoryStore {
    // Moka is used as a PerProcess store since it supports concurrency.
    inner: Arc<Cache<Fingerprint, ResponseEntry>, PerProcess>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new unbounded in-memory store.
    ///
    /// The store will use the default eviction policy (`TinyLFU`).
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory store with a maximum capacity.
    ///
    /// Once the capacity is reached, entries will be evicted using
    /// the `TinyLFU` policy (combination of LRU eviction and LFU admission).
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::with_capacity(1000);
    /// ```
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory store.
    ///
    /// The builder provides access to additional configuration options
    /// such as time-to-live, time-to-idle, and initial capacity.
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
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::new()
    }

    /// Constructs an `InMemoryStore` from a builder.
    ///
    /// This is called by `InMemoryStoreBuilder::build()` and should not
    /// be called directly by users.
    pub(crate) fn from_builder(builder: &InMemoryStoreBuilder) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(tti) = builder.time_to_idle {
            moka_builder = moka_builder.time_to_idle(tti);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: Arc::from_unaware(moka_builder.build()),
        }
    }
}

impl ResponseStore for InMemoryStore {
    async fn get(&self, key: &Fingerprint) -> Result<Option<ResponseEntry>, StoreError> {
        Ok(self.inner.get(key).await)
    }

    async fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> Result<(), StoreError> {
        self.inner.insert(key.clone(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<(), StoreError> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<Fingerprint>, StoreError> {
        Ok(self.inner.iter().map(|(key, _)| (*key).clone()).collect())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}

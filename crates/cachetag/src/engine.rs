// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache engine orchestrating lookup, store, and invalidation.

use std::time::Duration;

use tick::{Clock, FutureExt as _};

use cachetag_store::{Bytes, Fingerprint, ResponseEntry, ResponseStore, StoreError, TagSet};

use crate::{
    builder::EngineBuilder,
    ledger::TagLedger,
    locks::KeyLocks,
    report::{InvalidationReport, SweepReport},
    telemetry::{
        EngineActivity, EngineOperation, EngineTelemetry,
        ext::{ClockExt, EngineTelemetryExt},
    },
};

/// Type alias for engine names used in telemetry.
pub type EngineName = &'static str;

/// A tag-indexed response cache.
///
/// The engine owns a [`TagLedger`] and drives a
/// [`ResponseStore`](cachetag_store::ResponseStore), keeping the two mutually
/// consistent while requests are concurrently served, stored, and evicted:
///
/// - [`store`](Self::store) writes the body first and registers the tags
///   second, under a per-fingerprint lock, so no concurrent invalidation can
///   observe tags for a body that is not yet visible. A failed body write
///   leaves the ledger untouched.
/// - [`invalidate`](Self::invalidate) resolves the reverse index and evicts
///   each carrier atomically; a failed delete is reported and does not block
///   sibling evictions.
/// - [`sweep_expired`](Self::sweep_expired) reclaims entries past their TTL
///   through the same per-fingerprint path and is cancellable between
///   evictions.
///
/// One engine instance serves one cache namespace; independent namespaces
/// (e.g. per tenant) get independent engines sharing nothing.
///
/// # Examples
///
/// ```
/// use cachetag::{CacheEngine, Fingerprint, Tag, TagCollector};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let clock = Clock::new_frozen();
/// let engine = CacheEngine::builder(clock).memory().build();
///
/// let key = Fingerprint::new("nav:main");
/// let mut tags = TagCollector::new();
/// tags.add(Tag::new("navigation")?);
///
/// engine.store(&key, "<nav/>", tags, None).await?;
/// assert_eq!(engine.lookup(&key).await?.as_deref(), Some(&b"<nav/>"[..]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Debug)]
pub struct CacheEngine<S> {
    pub(crate) name: EngineName,
    pub(crate) store: S,
    pub(crate) clock: Clock,
    pub(crate) ttl: Option<Duration>,
    pub(crate) store_timeout: Option<Duration>,
    ledger: TagLedger,
    locks: KeyLocks,
    telemetry: Option<EngineTelemetry>,
}

impl CacheEngine<()> {
    /// Creates a new engine builder.
    ///
    /// The builder pattern allows configuring storage, TTL, the store
    /// timeout, and telemetry before constructing the engine.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::CacheEngine;
    /// use std::time::Duration;
    /// use tick::Clock;
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock)
    ///     .memory()
    ///     .ttl(Duration::from_secs(60))
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder(clock: Clock) -> EngineBuilder<()> {
        EngineBuilder::new(clock)
    }
}

/// Constructor and access methods.
impl<S> CacheEngine<S>
where
    S: ResponseStore,
{
    pub(crate) fn new(
        name: EngineName,
        store: S,
        clock: Clock,
        ttl: Option<Duration>,
        store_timeout: Option<Duration>,
        telemetry: Option<EngineTelemetry>,
    ) -> Self {
        Self {
            name,
            store,
            clock,
            ttl,
            store_timeout,
            ledger: TagLedger::new(),
            locks: KeyLocks::new(),
            telemetry,
        }
    }

    /// Returns the name of this engine for telemetry identification.
    #[must_use]
    pub fn name(&self) -> EngineName {
        self.name
    }

    /// Returns a reference to the engine's clock.
    ///
    /// The clock is used for timestamp generation and expiration checks.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a reference to the inner response store.
    ///
    /// This allows accessing store-specific functionality not exposed by
    /// the engine API.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Consumes the engine and returns the inner response store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Returns the number of stored responses, if the store tracks size.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.store.len()
    }

    /// Returns `true` if the store contains no responses.
    ///
    /// Returns `None` if the store doesn't track size.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.store.is_empty()
    }
}

/// Cache operations.
impl<S> CacheEngine<S>
where
    S: ResponseStore,
{
    /// Retrieves a cached response body.
    ///
    /// Returns `Ok(None)` if the fingerprint is not cached or the entry has
    /// expired; a miss is a normal result, never an error, and touches no
    /// index state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or exceeds the configured
    /// store timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::{CacheEngine, Fingerprint};
    /// use tick::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock).memory().build();
    ///
    /// let body = engine.lookup(&Fingerprint::new("missing")).await?;
    /// assert!(body.is_none());
    /// # Ok::<(), cachetag::StoreError>(())
    /// # });
    /// ```
    pub async fn lookup(&self, key: &Fingerprint) -> Result<Option<Bytes>, StoreError> {
        let timed = self.clock.timed_async(self.bounded(self.store.get(key))).await;
        match timed.result {
            Ok(Some(entry)) => {
                if self.is_expired(&entry) {
                    self.telemetry
                        .record(self.name, EngineOperation::Lookup, EngineActivity::Expired, timed.duration);
                    Ok(None)
                } else {
                    self.telemetry
                        .record(self.name, EngineOperation::Lookup, EngineActivity::Hit, timed.duration);
                    Ok(Some(entry.into_body()))
                }
            }
            Ok(None) => {
                self.telemetry
                    .record(self.name, EngineOperation::Lookup, EngineActivity::Miss, timed.duration);
                Ok(None)
            }
            Err(e) => {
                self.telemetry
                    .record(self.name, EngineOperation::Lookup, EngineActivity::Error, timed.duration);
                Err(e)
            }
        }
    }

    /// Returns `true` if a live (non-expired) response is cached for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn contains(&self, key: &Fingerprint) -> Result<bool, StoreError> {
        Ok(self.lookup(key).await?.is_some())
    }

    /// Stores a rendered response together with the tags that influenced it.
    ///
    /// The body is written to the store first; only once that write succeeds
    /// are the tags registered in the ledger, so a concurrent
    /// [`invalidate`](Self::invalidate) can never observe tags for a body
    /// that is not yet visible. If the body write fails, the ledger is left
    /// untouched and the operation has no side effects.
    ///
    /// `tags` accepts a [`TagSet`] or a [`TagCollector`](crate::TagCollector)
    /// handed down from the renderer. A `ttl` of `None` falls back to the
    /// engine-level TTL; entries without either never expire.
    ///
    /// Two racing stores on the same fingerprint both write; the last one to
    /// complete determines both the body and the full tag set (tag sets are
    /// replaced wholesale, never merged).
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails or exceeds the configured
    /// store timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::{CacheEngine, Fingerprint, Tag, TagCollector};
    /// use tick::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock).memory().build();
    ///
    /// let mut tags = TagCollector::new();
    /// tags.add(Tag::new("product-7")?);
    /// engine.store(&Fingerprint::new("prod:7:en"), "<html/>", tags, None).await?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn store(
        &self,
        key: &Fingerprint,
        body: impl Into<Bytes>,
        tags: impl Into<TagSet>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let tags = tags.into();
        let mut entry = ResponseEntry::new(body, tags.clone());
        if let Some(ttl) = ttl {
            entry.set_ttl(ttl);
        }
        entry.ensure_created_at(self.clock.system_time());

        let _guard = self.locks.acquire(key).await;
        let timed = self.clock.timed_async(self.bounded(self.store.put(key, entry))).await;
        match &timed.result {
            Ok(()) => {
                self.ledger.record(key.clone(), tags);
                self.telemetry
                    .record(self.name, EngineOperation::Store, EngineActivity::Stored, timed.duration);
                if let Some(size) = self.store.len() {
                    self.telemetry.record_size(self.name, size);
                }
            }
            Err(_) => {
                self.telemetry
                    .record(self.name, EngineOperation::Store, EngineActivity::Error, timed.duration);
            }
        }
        timed.result
    }

    /// Evicts every cached response carrying any of the given tags.
    ///
    /// The reverse index is resolved once, then each carrier is evicted under
    /// its per-fingerprint lock: delete the body, then prune the ledger. The
    /// operation is best-effort per fingerprint - a failed delete is collected
    /// in the report and does not block sibling evictions, and the ledger
    /// keeps the entry for a retry.
    ///
    /// An entry that was concurrently re-stored with tags that no longer
    /// intersect the request is skipped (it was created after the
    /// invalidation and survives).
    ///
    /// Invalidating twice in a row is harmless: the second call resolves no
    /// carriers and evicts nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::{CacheEngine, Fingerprint, Tag, TagSet};
    /// use tick::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock).memory().build();
    ///
    /// let tags: TagSet = [Tag::new("product-7")?].into_iter().collect();
    /// engine.store(&Fingerprint::new("prod:7:en"), "<html/>", tags.clone(), None).await?;
    ///
    /// let report = engine.invalidate(&tags).await;
    /// assert_eq!(report.evicted(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn invalidate(&self, tags: &TagSet) -> InvalidationReport {
        let keys = self.ledger.fingerprints_for(tags);
        let mut report = InvalidationReport::new();

        for key in keys {
            let _guard = self.locks.acquire(&key).await;

            // The entry may have been re-stored since the reverse index was
            // resolved; only evict it if it still carries a requested tag.
            if self.ledger.tags_of(&key).is_disjoint(tags) {
                report.record_skipped();
                continue;
            }

            let timed = self.clock.timed_async(self.bounded(self.store.delete(&key))).await;
            match timed.result {
                Ok(()) => {
                    self.ledger.forget(&key);
                    self.telemetry
                        .record(self.name, EngineOperation::Invalidate, EngineActivity::Evicted, timed.duration);
                    report.record_evicted();
                }
                Err(error) => {
                    self.telemetry
                        .record(self.name, EngineOperation::Invalidate, EngineActivity::Error, timed.duration);
                    report.record_failed(key, error);
                }
            }
        }

        if let Some(size) = self.store.len() {
            self.telemetry.record_size(self.name, size);
        }
        report
    }

    /// Evicts entries whose TTL has elapsed.
    ///
    /// Candidates are enumerated from a store snapshot, then each expired
    /// entry is evicted through the same atomic per-fingerprint path as
    /// [`invalidate`](Self::invalidate). The sweep awaits between evictions,
    /// so dropping the returned future at any checkpoint cancels the rest of
    /// the pass while leaving the store and ledger mutually consistent.
    ///
    /// Entries with neither a per-entry TTL nor an engine-level TTL never
    /// expire and are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate snapshot itself cannot be taken;
    /// per-entry failures are collected in the report instead.
    pub async fn sweep_expired(&self) -> Result<SweepReport, StoreError> {
        let keys = self.bounded(self.store.keys()).await?;
        let mut report = SweepReport::new();

        for key in keys {
            let _guard = self.locks.acquire(&key).await;

            // Re-read under the lock: the snapshot may be stale and the entry
            // may have been refreshed or removed since.
            let entry = match self.bounded(self.store.get(&key)).await {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(error) => {
                    report.record_failed(key, error);
                    continue;
                }
            };
            if !self.is_expired(&entry) {
                continue;
            }

            let timed = self.clock.timed_async(self.bounded(self.store.delete(&key))).await;
            match timed.result {
                Ok(()) => {
                    self.ledger.forget(&key);
                    self.telemetry
                        .record(self.name, EngineOperation::Sweep, EngineActivity::Swept, timed.duration);
                    report.record_swept();
                }
                Err(error) => {
                    self.telemetry
                        .record(self.name, EngineOperation::Sweep, EngineActivity::Error, timed.duration);
                    report.record_failed(key, error);
                }
            }
        }

        Ok(report)
    }

    /// Returns the tags currently registered for a fingerprint.
    ///
    /// This is a diagnostic read of the ledger; an unknown fingerprint
    /// returns an empty set.
    #[must_use]
    pub fn tags_of(&self, key: &Fingerprint) -> TagSet {
        self.ledger.tags_of(key)
    }

    fn is_expired(&self, entry: &ResponseEntry) -> bool {
        // Per-entry TTL takes precedence over the engine-level TTL
        let ttl = entry.ttl().or(self.ttl);
        if let Some(ttl) = ttl {
            match entry.created_at() {
                Some(created_at) => match self.clock.system_time().duration_since(created_at) {
                    Ok(elapsed) => elapsed > ttl,
                    Err(_) => true, // the system time went backwards
                },
                None => true, // with a TTL but no timestamp, treat as expired
            }
        } else {
            false
        }
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        match self.store_timeout {
            Some(limit) => match op.timeout(&self.clock, limit).await {
                Ok(result) => result,
                Err(error) => Err(StoreError::timeout(error)),
            },
            None => op.await,
        }
    }
}

/// Service implementation for the external-facing cache operations.
///
/// This exposes the engine behind the request/reply shapes an RPC boundary
/// exchanges, and lets the cache be composed with service middleware.
#[cfg(feature = "service")]
impl<S> layered::Service<cachetag_service::EngineRequest> for CacheEngine<S>
where
    S: ResponseStore,
{
    type Out = Result<cachetag_service::EngineReply, StoreError>;

    async fn execute(&self, input: cachetag_service::EngineRequest) -> Self::Out {
        use cachetag_service::{EngineReply, EngineRequest};

        match input {
            EngineRequest::Lookup { key } => {
                let body = self.lookup(&key).await?;
                Ok(EngineReply::Lookup(body))
            }
            EngineRequest::Store { key, body, tags, ttl } => {
                self.store(&key, body, tags, ttl).await?;
                Ok(EngineReply::Store())
            }
            EngineRequest::Invalidate { tags } => {
                let report = self.invalidate(&tags).await;
                Ok(EngineReply::Invalidate {
                    evicted: report.evicted(),
                    failed: report.failed_fingerprints(),
                })
            }
            EngineRequest::TagsOf { key } => Ok(EngineReply::TagsOf(self.tags_of(&key))),
        }
    }
}

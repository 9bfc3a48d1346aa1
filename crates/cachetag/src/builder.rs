// Copyright (c) Microsoft Corporation.

//! Engine builder for constructing configured cache engines.
//!
//! This module provides the builder pattern infrastructure for creating
//! engines with configurable storage, TTL, store timeout, and telemetry.

use std::time::Duration;

use tick::Clock;

use cachetag_store::ResponseStore;

use crate::{CacheEngine, telemetry::EngineTelemetry};

#[cfg(feature = "memory")]
use cachetag_memory::InMemoryStore;

/// Builder for constructing a [`CacheEngine`].
///
/// Created by calling [`CacheEngine::builder`]. Allows configuring storage,
/// TTL, the store timeout, and telemetry.
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
///     .store_timeout(Duration::from_millis(250))
///     .build();
/// ```
#[derive(Debug)]
pub struct EngineBuilder<S = ()> {
    name: Option<&'static str>,
    storage: S,
    ttl: Option<Duration>,
    store_timeout: Option<Duration>,
    clock: Clock,
    telemetry: Option<EngineTelemetry>,
}

impl EngineBuilder<()> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            name: None,
            storage: (),
            ttl: None,
            store_timeout: None,
            clock,
            telemetry: None,
        }
    }

    /// Sets a custom storage backend for the engine.
    ///
    /// Use this to provide your own
    /// [`ResponseStore`](cachetag_store::ResponseStore) implementation instead
    /// of the built-in options like [`memory()`](Self::memory).
    pub fn storage<S>(self, storage: S) -> EngineBuilder<S>
    where
        S: ResponseStore,
    {
        EngineBuilder {
            name: self.name,
            storage,
            ttl: self.ttl,
            store_timeout: self.store_timeout,
            clock: self.clock,
            telemetry: self.telemetry,
        }
    }

    /// Configures the engine to use in-memory storage.
    ///
    /// This is the most common storage backend, providing fast concurrent
    /// access with automatic eviction based on capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::CacheEngine;
    /// use tick::Clock;
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock).memory().build();
    /// ```
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory(self) -> EngineBuilder<InMemoryStore> {
        self.storage(InMemoryStore::new())
    }

    /// Configures the engine to use a service as the storage backend.
    ///
    /// This adapts any `Service<StoreRequest>` to work as a `ResponseStore`,
    /// enabling remote stores (Redis, Memcached) or sidecar-backed storage.
    /// The service can be composed with middleware (retry, timeout, circuit
    /// breakers) before being wrapped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let engine = CacheEngine::builder(clock)
    ///     .service(redis_service)
    ///     .ttl(Duration::from_secs(300))
    ///     .build();
    /// ```
    #[cfg(feature = "service")]
    #[must_use]
    #[expect(
        clippy::wrong_self_convention,
        reason = "builder method that consumes self to construct storage from service"
    )]
    pub fn service<S>(self, service: S) -> EngineBuilder<cachetag_service::ServiceAdapter<S>>
    where
        S: layered::Service<
                cachetag_service::StoreRequest,
                Out = Result<cachetag_service::StoreResponse, cachetag_store::StoreError>,
            > + Send
            + Sync,
    {
        self.storage(cachetag_service::ServiceAdapter::new(service))
    }
}

impl<S> EngineBuilder<S> {
    /// Sets the telemetry and name for this engine.
    ///
    /// The name is used to identify this engine in telemetry output.
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    #[must_use]
    pub fn telemetry(mut self, telemetry: EngineTelemetry, name: &'static str) -> Self {
        self.telemetry = Some(telemetry);
        self.name = Some(name);
        self
    }

    /// Sets the engine-level time-to-live (TTL) for stored entries.
    ///
    /// Entries older than the TTL report as lookup misses and are reclaimed
    /// by [`sweep_expired`](CacheEngine::sweep_expired). A per-entry TTL
    /// passed to [`store`](CacheEngine::store) overrides this setting.
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
    ///     .ttl(Duration::from_secs(300))
    ///     .build();
    /// ```
    #[must_use]
    pub fn ttl(mut self, ttl: impl Into<Duration>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Bounds every store operation to the given duration.
    ///
    /// An operation that has not completed when the bound elapses fails with
    /// a [`StoreErrorKind::Timeout`](cachetag_store::StoreErrorKind::Timeout)
    /// error instead of hanging. Callers are expected to retry timeouts with
    /// backoff.
    #[must_use]
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Returns a reference to the builder's clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<S> EngineBuilder<S>
where
    S: ResponseStore,
{
    /// Builds the engine with the configured storage and settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag::CacheEngine;
    /// use tick::Clock;
    ///
    /// let clock = Clock::new_frozen();
    /// let engine = CacheEngine::builder(clock).memory().build();
    /// ```
    pub fn build(self) -> CacheEngine<S> {
        CacheEngine::new(
            short_type_name::<S>(self.name),
            self.storage,
            self.clock,
            self.ttl,
            self.store_timeout,
            self.telemetry,
        )
    }
}

fn short_type_name<S>(user_name: Option<&'static str>) -> &'static str {
    if let Some(name) = user_name {
        name
    } else {
        let full = std::any::type_name::<S>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_with_user_name() {
        let name = short_type_name::<String>(Some("custom_name"));
        assert_eq!(name, "custom_name");
    }

    #[test]
    fn short_type_name_without_user_name() {
        let name = short_type_name::<String>(None);
        assert_eq!(name, "String");
    }

    #[test]
    fn builder_with_ttl() {
        let clock = Clock::new_frozen();
        let engine = CacheEngine::builder(clock).memory().ttl(Duration::from_secs(300)).build();

        assert_eq!(engine.ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn builder_with_store_timeout() {
        let clock = Clock::new_frozen();
        let engine = CacheEngine::builder(clock)
            .memory()
            .store_timeout(Duration::from_millis(250))
            .build();

        assert_eq!(engine.store_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn builder_defaults_name_to_storage_type() {
        let clock = Clock::new_frozen();
        let engine = CacheEngine::builder(clock).memory().build();

        assert_eq!(engine.name(), "InMemoryStore");
    }

    #[test]
    fn builder_with_telemetry() {
        use opentelemetry_sdk::metrics::SdkMeterProvider;

        let clock = Clock::new_frozen();
        let meter_provider = SdkMeterProvider::builder().build();
        let meter = crate::telemetry::metrics::create_meter(&meter_provider);
        let telemetry = EngineTelemetry::new(false, Some(&meter), clock.clone());

        let engine = CacheEngine::builder(clock)
            .memory()
            .telemetry(telemetry, "storefront_cache")
            .build();

        assert_eq!(engine.name(), "storefront_cache");
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A tag-indexed HTTP response cache with atomic invalidation by tag.
//!
//! This crate provides a cache engine that stores rendered responses keyed by
//! a request fingerprint, records the set of logical tags that influenced each
//! response, and can atomically evict every response carrying a tag - all
//! while requests are concurrently served, stored, and evicted. It offers:
//!
//! - A bidirectional [`TagLedger`] between fingerprints and tags, updated
//!   atomically with respect to concurrent readers
//! - A per-request [`TagCollector`] that renderers populate while producing a
//!   response
//! - Pluggable response storage through the
//!   [`ResponseStore`](cachetag_store::ResponseStore) contract
//! - Per-entry and engine-level TTL expiration with a cancellable sweep
//! - Built-in OpenTelemetry metrics and logging
//!
//! # Examples
//!
//! ## Store, Look Up, Invalidate
//!
//! ```
//! use cachetag::{CacheEngine, Fingerprint, Tag, TagCollector, TagSet};
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let clock = Clock::new_frozen();
//! let engine = CacheEngine::builder(clock).memory().build();
//!
//! // A renderer collects the tags that influenced the response.
//! let key = Fingerprint::new("prod:123:de");
//! let mut tags = TagCollector::new();
//! tags.add(Tag::new("product-123")?);
//! tags.add(Tag::new("manufacturer-55")?);
//!
//! engine.store(&key, "<html>...</html>", tags, None).await?;
//! assert!(engine.lookup(&key).await?.is_some());
//!
//! // A manufacturer update invalidates everything it influenced.
//! let stale: TagSet = [Tag::new("manufacturer-55")?].into_iter().collect();
//! let report = engine.invalidate(&stale).await;
//! assert_eq!(report.evicted(), 1);
//! assert!(engine.lookup(&key).await?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! ## Custom Storage Backend
//!
//! Any [`ResponseStore`](cachetag_store::ResponseStore) implementation can
//! back the engine:
//!
//! ```
//! use cachetag::{CacheEngine, InMemoryStore};
//! use tick::Clock;
//!
//! let clock = Clock::new_frozen();
//! let engine = CacheEngine::builder(clock)
//!     .storage(InMemoryStore::with_capacity(10_000))
//!     .build();
//! # let _ = engine;
//! ```

pub mod builder;
mod collector;
pub mod engine;
mod ledger;
mod locks;
mod report;
mod telemetry;

#[doc(inline)]
pub use builder::EngineBuilder;
#[cfg(feature = "memory")]
#[doc(inline)]
pub use cachetag_memory::{InMemoryStore, InMemoryStoreBuilder};
#[cfg(feature = "service")]
#[doc(inline)]
pub use cachetag_service::{EngineReply, EngineRequest, ServiceAdapter, StoreRequest, StoreResponse};
#[doc(inline)]
pub use cachetag_store::{
    Bytes, Fingerprint, InvalidTag, ResponseEntry, ResponseStore, StoreError, StoreErrorKind, Tag, TagSet,
};
#[doc(inline)]
pub use collector::TagCollector;
#[doc(inline)]
pub use engine::CacheEngine;
#[doc(inline)]
pub use ledger::TagLedger;
#[doc(inline)]
pub use report::{FailedEviction, InvalidationReport, PartialInvalidationFailure, SweepReport};
#[cfg(any(feature = "logs", feature = "metrics", test))]
#[doc(inline)]
pub use telemetry::EngineTelemetry;

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use cachetag_store::testing::{MockStore, StoreOp};

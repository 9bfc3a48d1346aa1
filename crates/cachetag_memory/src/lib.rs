// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! High-performance in-memory response store backed by moka.
//!
//! This crate provides [`InMemoryStore`], a concurrent in-memory response store
//! using moka's `TinyLFU` eviction algorithm for excellent hit rates. Use
//! [`InMemoryStoreBuilder`] to configure capacity, TTL, and TTI without exposing
//! moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use cachetag_memory::InMemoryStoreBuilder;
//! use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, TagSet};
//! use std::time::Duration;
//!
//! # futures::executor::block_on(async {
//! let store = InMemoryStoreBuilder::new()
//!     .max_capacity(1000)
//!     .time_to_live(Duration::from_secs(300))
//!     .build();
//!
//! let key = Fingerprint::new("prod:1");
//! store.put(&key, ResponseEntry::new("<html>", TagSet::new())).await?;
//! let entry = store.get(&key).await?;
//! assert_eq!(&entry.unwrap()[..], b"<html>");
//! # Ok::<(), cachetag_store::StoreError>(())
//! # });
//! ```
//!
//! # Features
//!
//! - **Capacity limits**: Set maximum entry count with automatic eviction
//! - **TTL/TTI**: Configure time-to-live and time-to-idle expiration as a
//!   second line of defense behind the engine's metadata-based expiry
//! - **Thread-safe**: Safe for concurrent access from multiple tasks
//! - **Zero external types**: Builder API avoids exposing moka in your public API

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::InMemoryStoreBuilder;
#[doc(inline)]
pub use store::InMemoryStore;

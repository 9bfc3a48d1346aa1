// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Response store abstractions for building tag-indexed response caches.
//!
//! This crate defines the [`ResponseStore`] trait that all response storage backends
//! must satisfy, along with [`ResponseEntry`] for storing rendered bodies with their
//! metadata, the [`Fingerprint`] and [`Tag`] key types, and [`StoreError`] for
//! fallible operations.
//!
//! # Overview
//!
//! The response store abstraction separates byte storage concerns from cache
//! semantics. Implement [`ResponseStore`] for your storage backend, then use
//! `cachetag` to add the tag ledger, invalidation, TTL, and telemetry on top.
//!
//! # Implementing a Response Store
//!
//! Implement all required methods of [`ResponseStore`]:
//!
//! ```
//! use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, StoreError};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore(RwLock<HashMap<Fingerprint, ResponseEntry>>);
//!
//! impl ResponseStore for SimpleStore {
//!     async fn get(&self, key: &Fingerprint) -> Result<Option<ResponseEntry>, StoreError> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> Result<(), StoreError> {
//!         self.0.write().unwrap().insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &Fingerprint) -> Result<(), StoreError> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn keys(&self) -> Result<Vec<Fingerprint>, StoreError> {
//!         Ok(self.0.read().unwrap().keys().cloned().collect())
//!     }
//! }
//! ```
//!
//! # Keys
//!
//! [`Fingerprint`] identifies a cacheable request; the engine treats it as opaque.
//! [`Tag`] is a validated label naming a piece of data that influenced a response;
//! construction rejects empty or whitespace-bearing strings with [`InvalidTag`].

mod entry;
pub mod error;
mod key;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use bytes::Bytes;
#[doc(inline)]
pub use entry::ResponseEntry;
#[doc(inline)]
pub use error::{InvalidTag, Result, StoreError, StoreErrorKind};
#[doc(inline)]
pub use key::{Fingerprint, Tag, TagSet};
#[doc(inline)]
pub use store::ResponseStore;

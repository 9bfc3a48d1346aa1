// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for response storage backends.
//!
//! [`ResponseStore`] defines the interface that all storage backends must
//! implement. This trait is designed for composition: implement the byte
//! storage operations, then use `cachetag` to layer the tag ledger,
//! invalidation, TTL, and telemetry on top.

use crate::{Fingerprint, ResponseEntry, StoreError};

/// Trait for response store implementations.
///
/// Implement this trait to create custom storage backends. Keys are request
/// [`Fingerprint`]s; values are [`ResponseEntry`] bodies with their metadata.
///
/// All four core methods are required: `get`, `put`, `delete`, and `keys`.
/// Only `len` and `is_empty` have default implementations:
/// - `len`: Returns `None` (not all stores track size)
/// - `is_empty`: Delegates to `len`
///
/// `keys` returns a point-in-time snapshot of stored fingerprints; it exists
/// so that the engine's expiry sweep can enumerate candidates when the backend
/// has no expiry of its own. The snapshot may be stale by the time it is used,
/// which is fine: every eviction re-reads the entry it is about to remove.
pub trait ResponseStore: Send + Sync {
    /// Gets a stored response, returning an error if the operation fails.
    ///
    /// A miss is a normal result (`Ok(None)`), never an error.
    fn get(&self, key: &Fingerprint) -> impl Future<Output = Result<Option<ResponseEntry>, StoreError>> + Send;

    /// Stores a response, returning an error if the operation fails.
    fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a stored response, returning an error if the operation fails.
    ///
    /// Deleting an absent key succeeds.
    fn delete(&self, key: &Fingerprint) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns a snapshot of the fingerprints currently stored.
    fn keys(&self) -> impl Future<Output = Result<Vec<Fingerprint>, StoreError>> + Send;

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}

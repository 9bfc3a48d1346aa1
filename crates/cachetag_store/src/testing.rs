// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock response store for testing.
//!
//! This module provides `MockStore`, a configurable in-memory store that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{Fingerprint, ResponseEntry, ResponseStore, StoreError};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A get operation was performed with the given key.
    Get(Fingerprint),
    /// A put operation was performed with the given key and entry.
    Put {
        /// The key that was stored.
        key: Fingerprint,
        /// The entry that was stored.
        entry: ResponseEntry,
    },
    /// A delete operation was performed with the given key.
    Delete(Fingerprint),
    /// A keys snapshot was taken.
    Keys,
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// This store keeps entries in memory and can be configured to fail
/// operations on demand, making it useful for testing error handling paths.
/// All operations are recorded for later verification.
///
/// # Examples
///
/// ```
/// use cachetag_store::testing::{MockStore, StoreOp};
/// use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, TagSet};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
/// let key = Fingerprint::new("prod:1");
///
/// store.put(&key, ResponseEntry::new("body", TagSet::new())).await?;
/// let entry = store.get(&key).await?;
/// assert_eq!(&entry.unwrap()[..], b"body");
/// # Ok::<(), cachetag_store::StoreError>(())
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use cachetag_store::testing::{MockStore, StoreOp};
/// use cachetag_store::{Fingerprint, ResponseStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// // Fail all delete operations
/// store.fail_when(|op| matches!(op, StoreOp::Delete(_)));
/// assert!(store.delete(&Fingerprint::new("k")).await.is_err());
///
/// // Fail only a specific key
/// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k.as_str() == "forbidden"));
/// assert!(store.get(&Fingerprint::new("forbidden")).await.is_err());
/// assert!(store.get(&Fingerprint::new("allowed")).await.is_ok());
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    data: Arc<Mutex<HashMap<Fingerprint, ResponseEntry>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<Fingerprint, ResponseEntry>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &Fingerprint) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should
    /// fail with [`StoreError::unavailable`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_store::testing::{MockStore, StoreOp};
    ///
    /// let store = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only puts
    /// store.fail_when(|op| matches!(op, StoreOp::Put { .. }));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &StoreOp) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl ResponseStore for MockStore {
    async fn get(&self, key: &Fingerprint) -> Result<Option<ResponseEntry>, StoreError> {
        let op = StoreOp::Get(key.clone());
        if self.should_fail(&op) {
            self.record(op);
            return Err(StoreError::unavailable("mock: get failed"));
        }
        self.record(op);
        Ok(self.data.lock().get(key).cloned())
    }

    async fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> Result<(), StoreError> {
        let op = StoreOp::Put {
            key: key.clone(),
            entry: entry.clone(),
        };
        if self.should_fail(&op) {
            self.record(op);
            return Err(StoreError::unavailable("mock: put failed"));
        }
        self.record(op);
        self.data.lock().insert(key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<(), StoreError> {
        let op = StoreOp::Delete(key.clone());
        if self.should_fail(&op) {
            self.record(op);
            return Err(StoreError::unavailable("mock: delete failed"));
        }
        self.record(op);
        self.data.lock().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<Fingerprint>, StoreError> {
        let op = StoreOp::Keys;
        if self.should_fail(&op) {
            self.record(op);
            return Err(StoreError::unavailable("mock: keys failed"));
        }
        self.record(op);
        Ok(self.data.lock().keys().cloned().collect())
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}

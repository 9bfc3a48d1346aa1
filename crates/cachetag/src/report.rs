// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Outcome reports for bulk eviction operations.

use cachetag_store::{Fingerprint, StoreError};

/// A fingerprint whose store delete failed during a bulk eviction.
#[derive(Debug)]
pub struct FailedEviction {
    key: Fingerprint,
    error: StoreError,
}

impl FailedEviction {
    pub(crate) fn new(key: Fingerprint, error: StoreError) -> Self {
        Self { key, error }
    }

    /// The fingerprint that could not be evicted.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.key
    }

    /// The store error that caused the failure.
    #[must_use]
    pub fn error(&self) -> &StoreError {
        &self.error
    }
}

/// Outcome of an [`invalidate`](crate::CacheEngine::invalidate) call.
///
/// Invalidation is best-effort per fingerprint: a failed store delete is
/// collected here and does not block the eviction of siblings. The ledger is
/// only pruned for fingerprints whose delete succeeded, so failed entries
/// remain reachable for a retry.
#[derive(Debug, Default)]
pub struct InvalidationReport {
    evicted: u64,
    skipped: u64,
    failed: Vec<FailedEviction>,
}

impl InvalidationReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_evicted(&mut self) {
        self.evicted += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn record_failed(&mut self, key: Fingerprint, error: StoreError) {
        self.failed.push(FailedEviction::new(key, error));
    }

    /// Number of fingerprints evicted from both the store and the ledger.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Number of fingerprints skipped because their tag set no longer
    /// intersected the invalidation request by the time they were reached
    /// (they were re-stored concurrently).
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// The fingerprints whose store delete failed.
    #[must_use]
    pub fn failed(&self) -> &[FailedEviction] {
        &self.failed
    }

    /// Returns the failed fingerprints by value.
    #[must_use]
    pub fn failed_fingerprints(&self) -> Vec<Fingerprint> {
        self.failed.iter().map(|f| f.key.clone()).collect()
    }

    /// Returns `true` if every resolved fingerprint was evicted or skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Converts the report into a result, treating any failed eviction as a
    /// [`PartialInvalidationFailure`].
    ///
    /// # Errors
    ///
    /// Returns [`PartialInvalidationFailure`] carrying the eviction count and
    /// the failed fingerprints when at least one delete failed.
    pub fn into_result(self) -> Result<u64, PartialInvalidationFailure> {
        if self.failed.is_empty() {
            Ok(self.evicted)
        } else {
            Err(PartialInvalidationFailure::new(self.evicted, self.failed_fingerprints()))
        }
    }
}

/// Outcome of a [`sweep_expired`](crate::CacheEngine::sweep_expired) pass.
#[derive(Debug, Default)]
pub struct SweepReport {
    swept: u64,
    failed: Vec<FailedEviction>,
}

impl SweepReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_swept(&mut self) {
        self.swept += 1;
    }

    pub(crate) fn record_failed(&mut self, key: Fingerprint, error: StoreError) {
        self.failed.push(FailedEviction::new(key, error));
    }

    /// Number of expired entries evicted.
    #[must_use]
    pub fn swept(&self) -> u64 {
        self.swept
    }

    /// The fingerprints whose eviction failed.
    #[must_use]
    pub fn failed(&self) -> &[FailedEviction] {
        &self.failed
    }
}

/// Some fingerprints could not be evicted during an invalidation.
///
/// The successful evictions stand: their bodies are gone and the ledger no
/// longer references them. The failed fingerprints keep their ledger entries
/// so a retried invalidation can reach them again.
#[ohno::error]
pub struct PartialInvalidationFailure {
    evicted: u64,
    failed: Vec<Fingerprint>,
}

impl PartialInvalidationFailure {
    /// Number of fingerprints that were successfully evicted.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// The fingerprints whose eviction failed.
    #[must_use]
    pub fn failed(&self) -> &[Fingerprint] {
        &self.failed
    }
}

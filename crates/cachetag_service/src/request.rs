// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Request and response types for store operations exposed through the Service trait.

use cachetag_store::{Fingerprint, ResponseEntry};

/// A store operation request.
///
/// This enum represents the [`ResponseStore`](cachetag_store::ResponseStore)
/// contract as service inputs. It enables composing storage backends with
/// middleware like retry, timeout, and circuit breakers.
#[derive(Debug, Clone)]
pub enum StoreRequest {
    /// Get a stored response
    Get(GetRequest),
    /// Store a response
    Put(PutRequest),
    /// Delete a stored response
    Delete(DeleteRequest),
    /// Snapshot the stored fingerprints
    Keys,
}

/// Request to get a stored response.
#[derive(Debug, Clone)]
pub struct GetRequest {
    /// The fingerprint to retrieve
    pub key: Fingerprint,
}

impl GetRequest {
    /// Creates a new get request for the given fingerprint.
    #[must_use]
    pub fn new(key: Fingerprint) -> Self {
        Self { key }
    }
}

/// Request to store a response.
#[derive(Debug, Clone)]
pub struct PutRequest {
    /// The fingerprint to store under
    pub key: Fingerprint,
    /// The entry to store (body, tags, and metadata)
    pub entry: ResponseEntry,
}

impl PutRequest {
    /// Creates a new put request for the given fingerprint and entry.
    #[must_use]
    pub fn new(key: Fingerprint, entry: ResponseEntry) -> Self {
        Self { key, entry }
    }
}

/// Request to delete a stored response.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    /// The fingerprint to delete
    pub key: Fingerprint,
}

impl DeleteRequest {
    /// Creates a new delete request for the given fingerprint.
    #[must_use]
    pub fn new(key: Fingerprint) -> Self {
        Self { key }
    }
}

/// Response from a store operation.
///
/// Each variant corresponds to the result of a store operation.
#[derive(Debug, Clone)]
pub enum StoreResponse {
    /// Response from a get operation
    Get(Option<ResponseEntry>),
    /// Response from a put operation
    Put(),
    /// Response from a delete operation
    Delete(),
    /// Response from a keys snapshot
    Keys(Vec<Fingerprint>),
}

impl StoreResponse {
    /// Returns `true` if this response represents a hit (Get with an entry).
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Get(Some(_)))
    }

    /// Returns `true` if this response represents a miss (Get without an entry).
    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Get(None))
    }

    /// Extracts the entry from a Get response, if present.
    #[must_use]
    pub fn into_entry(self) -> Option<ResponseEntry> {
        match self {
            Self::Get(entry) => entry,
            _ => None,
        }
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Adapter to use Service implementations as `ResponseStore` backends.
//!
//! This module adapts `Service<StoreRequest>` into a `ResponseStore`,
//! enabling remote stores (Redis, Memcached, sidecars) to back the cache.

use layered::Service;

use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, StoreError};

use crate::{DeleteRequest, GetRequest, PutRequest, StoreRequest, StoreResponse};

/// Adapter that converts a `Service<StoreRequest>` into a `ResponseStore`.
///
/// This enables using service-based storage implementations (like Redis or
/// Memcached) as backends for `CacheEngine`. The service can be composed
/// with middleware (retry, timeout, circuit breakers) before being wrapped
/// by this adapter.
///
/// # Examples
///
/// ```ignore
/// // Convert any Service<StoreRequest> to a ResponseStore
/// let store = ServiceAdapter::new(redis_service);
///
/// // Use as the engine's storage
/// let engine = CacheEngine::builder(clock)
///     .storage(store)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ServiceAdapter<S> {
    service: S,
}

impl<S> ServiceAdapter<S> {
    /// Creates a new `ServiceAdapter` wrapping the given service.
    ///
    /// The service must implement `Service<StoreRequest>` with
    /// output type `Result<StoreResponse, StoreError>`.
    #[must_use]
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Consumes the adapter and returns the inner service.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.service
    }

    /// Returns a reference to the inner service.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.service
    }
}

impl<S> ResponseStore for ServiceAdapter<S>
where
    S: Service<StoreRequest, Out = Result<StoreResponse, StoreError>> + Send + Sync,
{
    async fn get(&self, key: &Fingerprint) -> Result<Option<ResponseEntry>, StoreError> {
        let request = StoreRequest::Get(GetRequest::new(key.clone()));
        match self.service.execute(request).await? {
            StoreResponse::Get(entry) => Ok(entry),
            _ => Ok(None),
        }
    }

    async fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> Result<(), StoreError> {
        let request = StoreRequest::Put(PutRequest::new(key.clone(), entry));
        match self.service.execute(request).await? {
            StoreResponse::Put() => Ok(()),
            _ => Err(StoreError::unavailable("unexpected response type for put")),
        }
    }

    async fn delete(&self, key: &Fingerprint) -> Result<(), StoreError> {
        let request = StoreRequest::Delete(DeleteRequest::new(key.clone()));
        match self.service.execute(request).await? {
            StoreResponse::Delete() => Ok(()),
            _ => Err(StoreError::unavailable("unexpected response type for delete")),
        }
    }

    async fn keys(&self) -> Result<Vec<Fingerprint>, StoreError> {
        match self.service.execute(StoreRequest::Keys).await? {
            StoreResponse::Keys(keys) => Ok(keys),
            _ => Err(StoreError::unavailable("unexpected response type for keys")),
        }
    }

    fn len(&self) -> Option<u64> {
        // Service-based stores typically don't expose length information
        None
    }

    fn is_empty(&self) -> Option<bool> {
        None
    }
}

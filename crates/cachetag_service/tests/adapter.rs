// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the service adapter over a stateful backing service.

use std::collections::HashMap;
use std::sync::Mutex;

use layered::Service;

use cachetag_service::{ServiceAdapter, StoreRequest, StoreResponse};
use cachetag_store::{Fingerprint, ResponseEntry, ResponseStore, StoreError, TagSet};

/// A service that actually stores entries, as a remote store would.
#[derive(Debug, Default)]
struct InProcessStoreService {
    data: Mutex<HashMap<Fingerprint, ResponseEntry>>,
}

impl Service<StoreRequest> for InProcessStoreService {
    type Out = Result<StoreResponse, StoreError>;

    async fn execute(&self, input: StoreRequest) -> Self::Out {
        let mut data = self.data.lock().map_err(|_| StoreError::unavailable("poisoned lock"))?;
        Ok(match input {
            StoreRequest::Get(req) => StoreResponse::Get(data.get(&req.key).cloned()),
            StoreRequest::Put(req) => {
                data.insert(req.key, req.entry);
                StoreResponse::Put()
            }
            StoreRequest::Delete(req) => {
                data.remove(&req.key);
                StoreResponse::Delete()
            }
            StoreRequest::Keys => StoreResponse::Keys(data.keys().cloned().collect()),
        })
    }
}

#[tokio::test]
async fn adapter_round_trips_through_service() -> Result<(), StoreError> {
    let adapter = ServiceAdapter::new(InProcessStoreService::default());
    let key = Fingerprint::new("prod:7:en");

    assert!(adapter.get(&key).await?.is_none());

    adapter.put(&key, ResponseEntry::new("<html>", TagSet::new())).await?;
    let entry = adapter.get(&key).await?.expect("entry should exist");
    assert_eq!(&entry[..], b"<html>");

    adapter.delete(&key).await?;
    assert!(adapter.get(&key).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn adapter_keys_snapshot() -> Result<(), StoreError> {
    let adapter = ServiceAdapter::new(InProcessStoreService::default());

    adapter
        .put(&Fingerprint::new("a"), ResponseEntry::new("1", TagSet::new()))
        .await?;
    adapter
        .put(&Fingerprint::new("b"), ResponseEntry::new("2", TagSet::new()))
        .await?;

    let mut keys = adapter.keys().await?;
    keys.sort();
    assert_eq!(keys, vec![Fingerprint::new("a"), Fingerprint::new("b")]);
    Ok(())
}

#[tokio::test]
async fn adapter_propagates_service_errors() {
    #[derive(Debug)]
    struct FailingService;

    impl Service<StoreRequest> for FailingService {
        type Out = Result<StoreResponse, StoreError>;

        async fn execute(&self, _input: StoreRequest) -> Self::Out {
            Err(StoreError::unavailable("backend down"))
        }
    }

    let adapter = ServiceAdapter::new(FailingService);
    assert!(adapter.get(&Fingerprint::new("k")).await.is_err());
    assert!(adapter.keys().await.is_err());
}

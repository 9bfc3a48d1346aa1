// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Service pattern integration for the response cache.
//!
//! This crate provides two integration surfaces:
//!
//! - **Service → Store**: [`ServiceAdapter`] converts any
//!   `Service<StoreRequest>` into a
//!   [`ResponseStore`](cachetag_store::ResponseStore), enabling remote storage
//!   backends (Redis, Memcached, sidecars) composed with service middleware
//!   (retry, timeout, circuit breaker).
//! - **Engine → Service**: [`EngineRequest`]/[`EngineReply`] describe the
//!   external-facing cache operations (lookup, store, invalidate, tags-of);
//!   the main `cachetag::CacheEngine` implements `Service<EngineRequest>` so
//!   the whole cache can be exposed behind an RPC boundary or wrapped in
//!   middleware.
//!
//! # Quick Start
//!
//! ```ignore
//! // Any Service<StoreRequest> can become a response store
//! let store = ServiceAdapter::new(redis_service);
//! ```
//!
//! # Use Cases
//!
//! - **Remote stores**: Wrap Redis, Memcached, or custom services as storage
//! - **Middleware composition**: Add retry, timeout, or circuit breakers
//!   before the storage boundary
//! - **Remote invalidation**: Drive `invalidate` from a webhook or domain
//!   event consumer through the `EngineRequest` surface

pub mod adapter;
pub mod api;
pub mod request;

#[doc(inline)]
pub use adapter::ServiceAdapter;
#[doc(inline)]
pub use api::{EngineReply, EngineRequest};
#[doc(inline)]
pub use request::{DeleteRequest, GetRequest, PutRequest, StoreRequest, StoreResponse};

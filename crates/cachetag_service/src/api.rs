// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Request and response types for the external-facing cache operations.
//!
//! These shapes are what an RPC boundary around the cache exchanges:
//! a lookup replies with `{found, body}`, a store with plain success, an
//! invalidation with `{evicted, failed}`, and the diagnostic tags-of with
//! the current tag set. The engine implements `Service<EngineRequest>`
//! (behind the `service` feature of `cachetag`) using these types.

use std::time::Duration;

use cachetag_store::{Bytes, Fingerprint, TagSet};

/// An external-facing cache operation.
///
/// The invalidation trigger source (a webhook consumer, an admin action, a
/// domain-event bus) maps its events onto these requests; the mapping itself
/// is caller policy and not part of the cache.
#[derive(Debug, Clone)]
pub enum EngineRequest {
    /// Look up a cached response by fingerprint.
    Lookup {
        /// The fingerprint to look up
        key: Fingerprint,
    },
    /// Store a rendered response with the tags that influenced it.
    Store {
        /// The fingerprint to store under
        key: Fingerprint,
        /// The serialized response body
        body: Bytes,
        /// The tags that influenced the response
        tags: TagSet,
        /// Optional per-entry TTL overriding the engine default
        ttl: Option<Duration>,
    },
    /// Evict every response carrying any of the given tags.
    Invalidate {
        /// The tags to invalidate
        tags: TagSet,
    },
    /// Read the tags currently registered for a fingerprint (diagnostics).
    TagsOf {
        /// The fingerprint to inspect
        key: Fingerprint,
    },
}

/// Reply to an [`EngineRequest`].
#[derive(Debug, Clone)]
pub enum EngineReply {
    /// Reply to a lookup: the body if the fingerprint was cached.
    Lookup(Option<Bytes>),
    /// Reply to a successful store.
    Store(),
    /// Reply to an invalidation.
    Invalidate {
        /// Number of fingerprints evicted
        evicted: u64,
        /// Fingerprints whose store delete failed
        failed: Vec<Fingerprint>,
    },
    /// Reply to a tags-of query.
    TagsOf(TagSet),
}

impl EngineReply {
    /// Returns `true` if this reply represents a lookup hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Lookup(Some(_)))
    }

    /// Extracts the body from a lookup reply, if present.
    #[must_use]
    pub fn into_body(self) -> Option<Bytes> {
        match self {
            Self::Lookup(body) => body,
            _ => None,
        }
    }
}

// Copyright (c) Microsoft Corporation.

use std::{
    ops::Deref,
    time::{Duration, SystemTime},
};

use bytes::Bytes;

use crate::key::TagSet;

/// A stored response body with its cache metadata.
///
/// `ResponseEntry` carries the serialized body, the set of tags that influenced
/// its content, and optional timestamp and TTL information. The cache engine
/// uses the metadata for expiration tracking and the tag set to keep its
/// reverse index rebuildable from storage.
///
/// An empty tag set is legal: such an entry can only be evicted by TTL expiry
/// or an explicit delete, never by tag invalidation.
///
/// # Examples
///
/// ```
/// use cachetag_store::{ResponseEntry, Tag, TagSet};
/// use std::time::Duration;
///
/// let tags: TagSet = [Tag::new("product-123")?].into_iter().collect();
///
/// // Entry with just a body and its tags
/// let entry = ResponseEntry::new("<html>...</html>", tags.clone());
/// assert_eq!(entry.tags(), &tags);
///
/// // Entry with a per-entry TTL
/// let entry = ResponseEntry::with_ttl("<html>...</html>", tags, Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// # Ok::<(), cachetag_store::InvalidTag>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseEntry {
    body: Bytes,
    tags: TagSet,
    created_at: Option<SystemTime>,
    /// Per-entry TTL override. If set, takes precedence over the engine-level TTL.
    ttl: Option<Duration>,
}

impl ResponseEntry {
    /// Creates a new entry with the given body and tag set.
    ///
    /// The creation timestamp will be set by the engine when the entry is stored.
    pub fn new(body: impl Into<Bytes>, tags: TagSet) -> Self {
        Self {
            body: body.into(),
            tags,
            created_at: None,
            ttl: None,
        }
    }

    /// Creates a new entry with a per-entry TTL.
    ///
    /// The per-entry TTL takes precedence over any engine-level TTL.
    pub fn with_ttl(body: impl Into<Bytes>, tags: TagSet, ttl: Duration) -> Self {
        Self {
            body: body.into(),
            tags,
            created_at: None,
            ttl: Some(ttl),
        }
    }

    /// Creates a new entry with an explicit creation timestamp.
    ///
    /// This is typically used when recreating entries from persistent storage.
    pub fn with_created_at(body: impl Into<Bytes>, tags: TagSet, created_at: SystemTime) -> Self {
        Self {
            body: body.into(),
            tags,
            created_at: Some(created_at),
            ttl: None,
        }
    }

    /// Returns the timestamp at which this entry was stored.
    ///
    /// Returns `None` if the entry hasn't been stored yet or was created
    /// without a timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<SystemTime> {
        self.created_at
    }

    /// Sets the creation timestamp if it isn't already set.
    ///
    /// This is called by the engine when storing; an explicit timestamp from
    /// [`with_created_at`](Self::with_created_at) is preserved.
    pub fn ensure_created_at(&mut self, created_at: SystemTime) {
        if self.created_at.is_none() {
            self.created_at = Some(created_at);
        }
    }

    /// Returns the per-entry TTL, if set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets the per-entry TTL.
    ///
    /// This overrides any engine-level TTL for this specific entry.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = Some(ttl);
    }

    /// Returns the set of tags that influenced this response.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns a reference to the serialized body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the entry and returns the serialized body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

impl Deref for ResponseEntry {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

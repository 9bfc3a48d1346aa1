// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The bidirectional index between fingerprints and tags.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use cachetag_store::{Fingerprint, Tag, TagSet};

/// Bidirectional index between fingerprints and the tags they carry.
///
/// The ledger maintains a forward map (fingerprint → tag set) and a reverse
/// map (tag → fingerprint set). Both maps live behind a single lock so every
/// mutation updates them together: no reader ever observes a half-applied
/// `record` or `forget`, and a `fingerprints_for` read reflects every record
/// that completed before it began.
///
/// The ledger is a pure in-memory index and performs no I/O; the engine pairs
/// it with a [`ResponseStore`](cachetag_store::ResponseStore) and keeps the
/// two consistent.
///
/// # Examples
///
/// ```
/// use cachetag::TagLedger;
/// use cachetag_store::{Fingerprint, Tag, TagSet};
///
/// let ledger = TagLedger::new();
/// let key = Fingerprint::new("prod:123:de");
/// let tags: TagSet = [Tag::new("product-123")?].into_iter().collect();
///
/// ledger.record(key.clone(), tags.clone());
/// assert_eq!(ledger.tags_of(&key), tags);
/// assert!(ledger.fingerprints_for(&tags).contains(&key));
/// # Ok::<(), cachetag::InvalidTag>(())
/// ```
#[derive(Debug, Default)]
pub struct TagLedger {
    maps: RwLock<Maps>,
}

#[derive(Debug, Default)]
struct Maps {
    forward: HashMap<Fingerprint, TagSet>,
    reverse: HashMap<Tag, BTreeSet<Fingerprint>>,
}

impl TagLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the tag set for a fingerprint, replacing any prior set.
    ///
    /// Reverse links for tags no longer carried are removed and links for new
    /// tags are added in the same critical section. Duplicate tags are
    /// deduplicated by the set type itself. Recording an empty set is legal
    /// and means the fingerprint can never be reached by tag invalidation.
    pub fn record(&self, key: Fingerprint, tags: TagSet) {
        let mut guard = self.maps.write();
        let Maps { forward, reverse } = &mut *guard;

        let previous = forward.insert(key.clone(), tags.clone());
        if let Some(previous) = &previous {
            for tag in previous.difference(&tags) {
                if let Some(keys) = reverse.get_mut(tag) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        reverse.remove(tag);
                    }
                }
            }
        }
        for tag in &tags {
            reverse.entry(tag.clone()).or_default().insert(key.clone());
        }
    }

    /// Returns the current tag set for a fingerprint, or empty if unknown.
    #[must_use]
    pub fn tags_of(&self, key: &Fingerprint) -> TagSet {
        self.maps.read().forward.get(key).cloned().unwrap_or_default()
    }

    /// Returns the union of all fingerprints registered under any given tag.
    #[must_use]
    pub fn fingerprints_for<'a>(&self, tags: impl IntoIterator<Item = &'a Tag>) -> BTreeSet<Fingerprint> {
        let guard = self.maps.read();
        tags.into_iter()
            .filter_map(|tag| guard.reverse.get(tag))
            .flatten()
            .cloned()
            .collect()
    }

    /// Removes a fingerprint from the forward map and from every reverse set
    /// it belonged to.
    ///
    /// Forgetting an unknown fingerprint is a no-op.
    pub fn forget(&self, key: &Fingerprint) {
        let mut guard = self.maps.write();
        let Maps { forward, reverse } = &mut *guard;

        if let Some(tags) = forward.remove(key) {
            for tag in &tags {
                if let Some(keys) = reverse.get_mut(tag) {
                    keys.remove(key);
                    if keys.is_empty() {
                        reverse.remove(tag);
                    }
                }
            }
        }
    }

    /// Returns the number of fingerprints currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.read().forward.len()
    }

    /// Returns `true` if no fingerprints are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.read().forward.is_empty()
    }

    /// Returns the number of distinct tags with at least one fingerprint.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.maps.read().reverse.len()
    }
}

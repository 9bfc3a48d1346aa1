// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-request accumulator for response tags.

use cachetag_store::{Tag, TagSet};

/// Request-scoped accumulator for the tags that influence a response.
///
/// A collector is created fresh for each render, handed down the render call
/// chain as an explicit argument, and finally passed to
/// [`CacheEngine::store`](crate::CacheEngine::store). It is an owned value and
/// is never shared across concurrent requests; after the response is stored
/// (or the request aborts) it is simply dropped.
///
/// Adding the same tag twice is harmless; the underlying set deduplicates.
///
/// # Examples
///
/// ```
/// use cachetag::{Tag, TagCollector};
///
/// let mut collector = TagCollector::new();
/// collector.add(Tag::new("navigation")?);
/// collector.add(Tag::new("product-123")?);
/// collector.add(Tag::new("product-123")?); // deduplicated
///
/// assert_eq!(collector.len(), 2);
/// # Ok::<(), cachetag::InvalidTag>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagCollector {
    tags: TagSet,
}

impl TagCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single tag.
    pub fn add(&mut self, tag: Tag) {
        self.tags.insert(tag);
    }

    /// Returns the tags collected so far.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns the number of distinct tags collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no tags have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Consumes the collector and returns the accumulated tag set.
    #[must_use]
    pub fn into_tag_set(self) -> TagSet {
        self.tags
    }
}

impl Extend<Tag> for TagCollector {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, tags: I) {
        self.tags.extend(tags);
    }
}

impl From<TagCollector> for TagSet {
    fn from(collector: TagCollector) -> Self {
        collector.tags
    }
}

impl FromIterator<Tag> for TagCollector {
    fn from_iter<I: IntoIterator<Item = Tag>>(tags: I) -> Self {
        Self {
            tags: tags.into_iter().collect(),
        }
    }
}

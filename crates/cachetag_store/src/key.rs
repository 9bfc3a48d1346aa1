// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key types for the response store: fingerprints and tags.

use std::{collections::BTreeSet, fmt, sync::Arc};

use crate::error::InvalidTag;

/// The deterministic identifier of a cacheable request.
///
/// Fingerprints are opaque to the cache: how one is derived (URL, sales
/// context, rule set, ...) is entirely the caller's concern. They are cheap
/// to clone and are used as the primary key for stored responses.
///
/// # Examples
///
/// ```
/// use cachetag_store::Fingerprint;
///
/// let key = Fingerprint::new("prod:123:de");
/// assert_eq!(key.as_str(), "prod:123:de");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(Arc<str>);

impl Fingerprint {
    /// Creates a fingerprint from any string-like value.
    ///
    /// Fingerprints are never interpreted, so construction cannot fail.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:?})", &*self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Fingerprint {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// An opaque label naming a piece of data that influenced a response.
///
/// Tags have no internal structure; equality is exact string match. The only
/// validation applied is at construction: empty strings and strings containing
/// whitespace or control characters are rejected, since such tags can never be
/// produced by a well-behaved invalidation source and usually indicate a
/// formatting bug at the call site.
///
/// # Examples
///
/// ```
/// use cachetag_store::Tag;
///
/// let tag = Tag::new("product-123")?;
/// assert_eq!(tag.as_str(), "product-123");
///
/// assert!(Tag::new("").is_err());
/// assert!(Tag::new("product 123").is_err());
/// # Ok::<(), cachetag_store::InvalidTag>(())
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(Arc<str>);

/// A set of tags, ordered for deterministic iteration.
pub type TagSet = BTreeSet<Tag>;

impl Tag {
    /// Creates a tag, validating it at the API boundary.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTag`] if the tag is empty or contains whitespace or
    /// control characters.
    pub fn new(tag: impl Into<Arc<str>>) -> Result<Self, InvalidTag> {
        let tag = tag.into();
        if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidTag::rejected(&*tag));
        }
        Ok(Self(tag))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", &*self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Tag {
    type Error = InvalidTag;

    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

impl TryFrom<String> for Tag {
    type Error = InvalidTag;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_round_trips_source_string() {
        let key = Fingerprint::new("nav:main");
        assert_eq!(key.as_str(), "nav:main");
        assert_eq!(key.to_string(), "nav:main");
        assert_eq!(key, Fingerprint::from("nav:main"));
    }

    #[test]
    fn fingerprint_debug_shows_key() {
        let key = Fingerprint::new("prod:1");
        assert_eq!(format!("{key:?}"), "Fingerprint(\"prod:1\")");
    }

    #[test]
    fn tag_accepts_typical_labels() {
        for label in ["navigation", "product-123", "manufacturer-55", "a"] {
            let tag = Tag::new(label).expect("label should be valid");
            assert_eq!(tag.as_str(), label);
        }
    }

    #[test]
    fn tag_rejects_empty() {
        let err = Tag::new("").expect_err("empty tag must be rejected");
        assert_eq!(err.tag(), "");
    }

    #[test]
    fn tag_rejects_whitespace_and_control_characters() {
        for label in ["product 123", " leading", "trailing ", "tab\there", "nul\0"] {
            assert!(Tag::new(label).is_err(), "{label:?} should be rejected");
        }
    }

    #[test]
    fn tag_equality_is_exact_string_match() {
        let a = Tag::new("product-1").expect("valid");
        let b = Tag::new("product-1").expect("valid");
        let c = Tag::new("product-10").expect("valid");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tag_set_deduplicates() {
        let mut tags = TagSet::new();
        tags.insert(Tag::new("navigation").expect("valid"));
        tags.insert(Tag::new("navigation").expect("valid"));
        assert_eq!(tags.len(), 1);
    }
}

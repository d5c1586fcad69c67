//! Storage namespaces and key layout

use crate::identity::{UserId, ANONYMOUS_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First segment of every physical key
pub const KEY_ROOT: &str = "practa";

/// Slug prefix reserved for first-party units
pub const BUILTIN_SLUG_PREFIX: &str = "builtin-";

/// Stable identifier scoping one unit's storage
///
/// Community packages use their declared slug; first-party units use
/// `builtin-{type}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PractaSlug(String);

impl PractaSlug {
    /// Slug for a community package
    #[inline]
    #[must_use]
    pub fn community(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Slug for a first-party unit type
    #[inline]
    #[must_use]
    pub fn builtin(practa_type: &str) -> Self {
        Self(format!("{BUILTIN_SLUG_PREFIX}{practa_type}"))
    }

    /// Check if `slug` falls in the first-party range
    ///
    /// Community packages must not use such a slug, or they would share
    /// storage with a builtin unit.
    #[inline]
    #[must_use]
    pub fn is_reserved(slug: &str) -> bool {
        slug.starts_with(BUILTIN_SLUG_PREFIX)
    }

    /// Slug text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PractaSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `(user, slug)` pair scoping a set of keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageNamespace {
    user: UserId,
    slug: PractaSlug,
}

impl StorageNamespace {
    /// Create namespace
    #[inline]
    #[must_use]
    pub fn new(user: UserId, slug: PractaSlug) -> Self {
        Self { user, slug }
    }

    /// Owning user
    #[inline]
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Owning unit
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &PractaSlug {
        &self.slug
    }

    /// `practa:{user}:{slug}:` with both segments escaped
    #[must_use]
    pub fn prefix(&self) -> String {
        format!(
            "{KEY_ROOT}:{}:{}:",
            user_segment(&self.user),
            escape_segment(self.slug.as_str())
        )
    }

    /// Physical key for a unit-level key
    ///
    /// The unit key is the last segment and is kept verbatim: it cannot
    /// move the prefix, so it needs no escaping.
    #[must_use]
    pub fn key(&self, key: &str) -> String {
        let mut full = self.prefix();
        full.push_str(key);
        full
    }

    /// Recover the unit-level key from a physical key in this namespace
    #[must_use]
    pub fn strip<'a>(&self, full_key: &'a str) -> Option<&'a str> {
        full_key.strip_prefix(self.prefix().as_str())
    }
}

impl fmt::Display for StorageNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.slug)
    }
}

/// Anonymous users own every segment starting with `anon-`; an
/// authenticated subject with that prefix has its leading `a` escaped.
fn user_segment(user: &UserId) -> String {
    match user {
        UserId::Anonymous { device_id } => {
            format!("{ANONYMOUS_PREFIX}{}", escape_segment(device_id))
        }
        UserId::Authenticated { subject } => {
            let escaped = escape_segment(subject);
            match escaped.strip_prefix('a') {
                Some(rest) if escaped.starts_with(ANONYMOUS_PREFIX) => format!("%61{rest}"),
                _ => escaped,
            }
        }
    }
}

/// Percent-escape the separator so a segment can never span two segments.
fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    out
}

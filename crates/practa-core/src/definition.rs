//! Catalog entries and Flow definitions

use practa_storage::PractaSlug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of one Flow run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(String);

impl FlowId {
    /// Wrap an existing identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh, time-sortable identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("flow-{}", ulid::Ulid::new().to_string().to_lowercase()))
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a unit type comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PractaOrigin {
    /// Shipped with the app
    #[default]
    Builtin,
    /// Published community package
    Community {
        /// Declared package id
        slug: String,
    },
}

/// Static description of a unit in a Flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PractaDefinition {
    /// Unique within its Flow
    pub id: String,
    /// Catalog key the unit implementation is looked up by
    #[serde(rename = "type")]
    pub practa_type: String,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Builtin or community
    #[serde(default)]
    pub origin: PractaOrigin,
}

impl PractaDefinition {
    /// First-party definition
    #[must_use]
    pub fn builtin(id: impl Into<String>, practa_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            practa_type: practa_type.into(),
            name: name.into(),
            description: None,
            origin: PractaOrigin::Builtin,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With origin
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: PractaOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Check if this entry came from a community package
    #[inline]
    #[must_use]
    pub fn is_community(&self) -> bool {
        matches!(self.origin, PractaOrigin::Community { .. })
    }

    /// Slug the unit's storage is scoped by
    #[must_use]
    pub fn storage_slug(&self) -> PractaSlug {
        match &self.origin {
            PractaOrigin::Builtin => PractaSlug::builtin(&self.practa_type),
            PractaOrigin::Community { slug } => PractaSlug::community(slug.clone()),
        }
    }
}

/// Ordered sequence of units run as one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    /// Flow identifier
    pub id: FlowId,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Steps, in execution order
    pub practas: Vec<PractaDefinition>,
}

impl FlowDefinition {
    /// Create a Flow with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>, practas: Vec<PractaDefinition>) -> Self {
        Self {
            id: FlowId::generate(),
            name: name.into(),
            description: None,
            practas,
        }
    }

    /// With explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: FlowId) -> Self {
        self.id = id;
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.practas.len()
    }

    /// Check if the Flow has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.practas.is_empty()
    }

    /// Step at `index`
    #[inline]
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&PractaDefinition> {
        self.practas.get(index)
    }
}

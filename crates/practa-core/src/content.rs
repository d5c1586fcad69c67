//! Unit output payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tagged payload produced by a completed unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PractaContent {
    /// Plain text (journal entry, intention, gratitude list)
    Text {
        /// The text
        value: String,
    },
    /// Image reference
    Image {
        /// Image URI
        value: String,
        /// Accessible description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// Voice recording with its transcript
    #[serde(rename_all = "camelCase")]
    AudioTranscript {
        /// Transcript text
        value: String,
        /// Recording URI
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_uri: Option<String>,
        /// Recording length in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
}

impl PractaContent {
    /// Text content
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Primary value regardless of kind
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Text { value } | Self::Image { value, .. } | Self::AudioTranscript { value, .. } => {
                value
            }
        }
    }

    /// Wire name of the kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::AudioTranscript { .. } => "audio-transcript",
        }
    }
}

/// Who produced a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Entered by the user
    User,
    /// Generated by a model
    Ai,
    /// Produced by the app itself
    System,
}

/// Annotation a unit attaches to its output
///
/// Well-known keys are typed; anything else lands in `extra` and round-trips
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PractaMetadata {
    /// Origin of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ContentSource>,
    /// Time spent in the unit, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Rice awarded for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rice_earned: Option<u32>,
    /// Domain-specific keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PractaMetadata {
    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: ContentSource) -> Self {
        self.source = Some(source);
        self
    }

    /// With duration in seconds
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// With rice reward
    #[inline]
    #[must_use]
    pub fn with_rice(mut self, rice: u32) -> Self {
        self.rice_earned = Some(rice);
        self
    }

    /// With a domain-specific key
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Domain-specific key
    #[inline]
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

/// What a unit hands back on completion
///
/// Both fields are optional: an empty output just means "done".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PractaOutput {
    /// Produced content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PractaContent>,
    /// Annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PractaMetadata>,
}

impl PractaOutput {
    /// Empty output
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Output carrying text content
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::empty().with_content(PractaContent::text(value))
    }

    /// With content
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: PractaContent) -> Self {
        self.content = Some(content);
        self
    }

    /// With metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: PractaMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check if neither content nor metadata is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.metadata.is_none()
    }

    /// Rice reported in metadata, zero when absent
    #[must_use]
    pub fn rice_earned(&self) -> u32 {
        self.metadata
            .as_ref()
            .and_then(|m| m.rice_earned)
            .unwrap_or(0)
    }
}

//! Community package descriptor (`metadata.json`)
//!
//! `id` is the canonical identifier key. Older packages used `type`; those
//! documents are rewritten once by [`migrate_descriptor`] on read.

use crate::definition::{PractaDefinition, PractaOrigin};
use crate::error::ContractError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical identifier key
pub const ID_KEY: &str = "id";

/// Legacy identifier key
pub const LEGACY_ID_KEY: &str = "type";

/// Which key a raw descriptor uses for its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKey {
    /// `id`
    Id,
    /// `type` only
    LegacyType,
}

/// Identifier key used by a raw descriptor, if any
#[must_use]
pub fn identifier_key(document: &Value) -> Option<IdentifierKey> {
    let object = document.as_object()?;
    if object.contains_key(ID_KEY) {
        Some(IdentifierKey::Id)
    } else if object.contains_key(LEGACY_ID_KEY) {
        Some(IdentifierKey::LegacyType)
    } else {
        None
    }
}

/// Rewrite a legacy descriptor in place to use `id`
///
/// Returns `true` if the document changed. A document carrying both keys
/// with the same value loses the legacy key.
///
/// # Errors
///
/// [`ContractError::NotAnObject`] for non-object documents and
/// [`ContractError::ConflictingIdentifiers`] when both keys disagree.
pub fn migrate_descriptor(document: &mut Value) -> Result<bool, ContractError> {
    let object = document.as_object_mut().ok_or(ContractError::NotAnObject)?;
    let Some(legacy) = object.remove(LEGACY_ID_KEY) else {
        return Ok(false);
    };

    match object.get(ID_KEY).cloned() {
        None => {
            object.insert(ID_KEY.to_string(), legacy);
        }
        Some(id) if id == legacy => {}
        Some(id) => {
            let conflict = ContractError::ConflictingIdentifiers {
                id: display_value(&id),
                legacy: display_value(&legacy),
            };
            object.insert(LEGACY_ID_KEY.to_string(), legacy);
            return Err(conflict);
        }
    }
    tracing::debug!("migrated legacy `type` identifier to `id`");
    Ok(true)
}

fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

/// Published metadata of a community package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    /// Package slug
    pub id: String,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Author handle
    pub author: String,
    /// Semantic version
    pub version: String,
    /// Expected length, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    /// Catalog category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PackageDescriptor {
    /// Parse a raw document, accepting the legacy identifier key
    ///
    /// # Errors
    ///
    /// Any [`ContractError`] from migration or deserialization.
    pub fn from_value(mut document: Value) -> Result<Self, ContractError> {
        migrate_descriptor(&mut document)?;
        Ok(serde_json::from_value(document)?)
    }

    /// Parse descriptor JSON text
    ///
    /// # Errors
    ///
    /// Any [`ContractError`] from parsing, migration or deserialization.
    pub fn from_json(raw: &str) -> Result<Self, ContractError> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Catalog entry for this package
    ///
    /// The package id doubles as the unit type and the storage slug.
    #[must_use]
    pub fn to_definition(&self) -> PractaDefinition {
        PractaDefinition {
            id: self.id.clone(),
            practa_type: self.id.clone(),
            name: self.name.clone(),
            description: Some(self.description.clone()),
            origin: PractaOrigin::Community {
                slug: self.id.clone(),
            },
        }
    }
}

//! Submission validator

use crate::checks;
use crate::package::PackageSource;
use crate::report::{ValidationReport, ValidationResult};
use practa_core::{
    identifier_key, migrate_descriptor, ContractError, IdentifierKey, PractaSlug, BUILTIN_SLUG_PREFIX,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

const CHECK_METADATA: &str = "metadata";
const CHECK_LEGACY_ID: &str = "legacy-identifier";
const CHECK_REQUIRED: &str = "required-fields";
const CHECK_ID_FORMAT: &str = "id-format";
const CHECK_VERSION: &str = "version-format";
const CHECK_DURATION: &str = "estimated-duration";

const REQUIRED_FIELDS: [&str; 5] = ["id", "name", "description", "author", "version"];

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| checks::pattern(r"^[a-z0-9]+(-[a-z0-9]+)*$"));
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| checks::pattern(r"^\d+\.\d+\.\d+$"));

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Shortest accepted package id
    pub min_id_len: usize,
    /// Longest accepted package id
    pub max_id_len: usize,
}

impl ValidatorConfig {
    /// With id length bounds
    #[inline]
    #[must_use]
    pub fn with_id_len(mut self, min: usize, max: usize) -> Self {
        self.min_id_len = min;
        self.max_id_len = max;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_id_len: 3,
            max_id_len: 50,
        }
    }
}

/// Runs every check over a package
#[derive(Debug, Clone, Default)]
pub struct SubmissionValidator {
    config: ValidatorConfig,
}

impl SubmissionValidator {
    /// Create validator
    #[inline]
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a package
    ///
    /// Order: default export, descriptor checks, completion call, advisories.
    #[must_use]
    pub fn validate(&self, package: &PackageSource) -> ValidationReport {
        let mut results = vec![checks::default_export(package.entry())];
        self.check_metadata(package.metadata_json(), &mut results);
        results.push(checks::on_complete(package.entry()));
        results.extend(checks::advisories(package.entry()));

        let report = ValidationReport::new(results);
        tracing::debug!(
            valid = report.is_valid(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "package validated"
        );
        report
    }

    fn check_metadata(&self, raw: Option<&str>, results: &mut Vec<ValidationResult>) {
        let Some(raw) = raw else {
            results.push(ValidationResult::error(
                CHECK_METADATA,
                "Missing metadata document",
            ));
            return;
        };
        let mut document: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                results.push(ValidationResult::error(
                    CHECK_METADATA,
                    format!("Metadata is not valid JSON: {e}"),
                ));
                return;
            }
        };

        if identifier_key(&document) == Some(IdentifierKey::LegacyType) {
            results.push(ValidationResult::warning(
                CHECK_LEGACY_ID,
                "Metadata uses legacy `type` as identifier; rename it to `id`",
            ));
        }
        match migrate_descriptor(&mut document) {
            Ok(_) => {}
            Err(ContractError::NotAnObject) => {
                results.push(ValidationResult::error(
                    CHECK_METADATA,
                    "Metadata must be a JSON object",
                ));
                return;
            }
            Err(e) => {
                results.push(ValidationResult::error(CHECK_LEGACY_ID, e.to_string()));
                return;
            }
        }
        let Some(fields) = document.as_object() else {
            return;
        };

        let missing: Vec<ValidationResult> = REQUIRED_FIELDS
            .iter()
            .filter(|field| non_empty_str(fields, field).is_none())
            .map(|field| {
                ValidationResult::error(
                    CHECK_REQUIRED,
                    format!("Missing or empty required field `{field}`"),
                )
            })
            .collect();
        if missing.is_empty() {
            results.push(ValidationResult::success(
                CHECK_REQUIRED,
                "All required fields present",
            ));
        } else {
            results.extend(missing);
        }

        if let Some(id) = non_empty_str(fields, "id") {
            results.push(self.check_id(id));
        }
        if let Some(version) = non_empty_str(fields, "version") {
            results.push(check_version(version));
        }

        results.push(match fields.get("estimatedDuration") {
            Some(Value::Number(_)) => {
                ValidationResult::success(CHECK_DURATION, "Estimated duration declared")
            }
            Some(_) => ValidationResult::warning(
                CHECK_DURATION,
                "estimatedDuration should be a number of seconds",
            ),
            None => ValidationResult::warning(
                CHECK_DURATION,
                "Consider declaring estimatedDuration",
            ),
        });
    }

    fn check_id(&self, id: &str) -> ValidationResult {
        let len = id.chars().count();
        if len < self.config.min_id_len || len > self.config.max_id_len {
            return ValidationResult::error(
                CHECK_ID_FORMAT,
                format!(
                    "Identifier `{id}` must be {}-{} characters long",
                    self.config.min_id_len, self.config.max_id_len
                ),
            );
        }
        if PractaSlug::is_reserved(id) {
            return ValidationResult::error(
                CHECK_ID_FORMAT,
                format!("Identifier `{id}` must not start with `{BUILTIN_SLUG_PREFIX}`"),
            );
        }
        if ID_PATTERN.is_match(id) {
            ValidationResult::success(CHECK_ID_FORMAT, "Identifier is a valid slug")
        } else {
            ValidationResult::error(
                CHECK_ID_FORMAT,
                format!("Identifier `{id}` must be lowercase words joined by single hyphens"),
            )
        }
    }
}

fn check_version(version: &str) -> ValidationResult {
    if VERSION_PATTERN.is_match(version) {
        ValidationResult::success(CHECK_VERSION, "Version is MAJOR.MINOR.PATCH")
    } else {
        ValidationResult::error(
            CHECK_VERSION,
            format!("Version `{version}` must be MAJOR.MINOR.PATCH"),
        )
    }
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

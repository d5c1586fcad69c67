//! Validation records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of one check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks acceptance
    Error,
    /// Advisory
    Warning,
    /// Check passed
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Success => "success",
        })
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Check identifier
    pub check: String,
    /// Whether the check passed
    pub passed: bool,
    /// Human-readable outcome
    pub message: String,
    /// Severity
    pub severity: Severity,
}

impl ValidationResult {
    /// Passed check
    #[must_use]
    pub fn success(check: &str, message: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            passed: true,
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Blocking failure
    #[must_use]
    pub fn error(check: &str, message: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            passed: false,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Advisory failure
    #[must_use]
    pub fn warning(check: &str, message: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            passed: false,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.check, self.message)
    }
}

/// All check outcomes for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    is_valid: bool,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Build report; validity is derived from the results
    #[must_use]
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let is_valid = !results.iter().any(|r| r.severity == Severity::Error);
        Self { is_valid, results }
    }

    /// True when no result has error severity
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Every result in check order
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Results of one severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(move |r| r.severity == severity)
    }

    /// Number of errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    /// Number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }
}

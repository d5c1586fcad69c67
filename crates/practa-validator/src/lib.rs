//! Practa Submission Validator
//!
//! Gates a community package before acceptance. Every check yields a
//! [`ValidationResult`]; only `error` results make a report invalid.
//! Validation never fails as an operation: reading the package from disk
//! is the only fallible step ([`PackageError`]).
//!
//! # Example
//!
//! ```rust
//! use practa_validator::{PackageSource, SubmissionValidator, ValidatorConfig};
//!
//! let source = PackageSource::new(
//!     "export default function Box({ onComplete }) { onComplete({}); }",
//! )
//! .with_metadata_json(
//!     r#"{"id":"box-breath","name":"Box","description":"Breathe","author":"sam","version":"1.0.0"}"#,
//! );
//! let report = SubmissionValidator::new(ValidatorConfig::default()).validate(&source);
//! assert!(report.is_valid());
//! ```

#![warn(unreachable_pub)]

mod checks;
mod error;
mod package;
mod report;
mod validator;

pub use error::PackageError;
pub use package::{PackageSource, ENTRY_FILE, METADATA_FILE};
pub use report::{Severity, ValidationReport, ValidationResult};
pub use validator::{SubmissionValidator, ValidatorConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

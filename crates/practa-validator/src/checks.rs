//! Source-text checks
//!
//! These are textual: they show that something is present, not that it is
//! used correctly.

use crate::report::ValidationResult;
use regex::Regex;
use std::sync::LazyLock;

pub(crate) const CHECK_DEFAULT_EXPORT: &str = "default-export";
pub(crate) const CHECK_ON_COMPLETE: &str = "on-complete";
pub(crate) const CHECK_THEME: &str = "theme";
pub(crate) const CHECK_HAPTICS: &str = "haptics";
pub(crate) const CHECK_SKIP: &str = "skip-support";
pub(crate) const CHECK_SAFE_AREA: &str = "safe-area";

pub(crate) fn pattern(re: &str) -> Regex {
    match Regex::new(re) {
        Ok(regex) => regex,
        Err(e) => unreachable!("invalid built-in pattern {re}: {e}"),
    }
}

static DEFAULT_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\bexport\s+default\s+(?:async\s+)?(function\b|class\b|\(|[A-Za-z_$][\w$]*)")
});

/// Words that can follow `export default` without naming a component
const NOT_CALLABLE: [&str; 9] = [
    "null", "undefined", "true", "false", "new", "void", "typeof", "delete", "this",
];
static ANY_DEFAULT: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bexport\s+default\b"));
static NAMED_AS_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bexport\s*\{[^}]*\bas\s+default\b[^}]*\}"));
static ON_COMPLETE_CALL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bonComplete\s*(?:\?\.)?\s*\("));
static USE_THEME: LazyLock<Regex> = LazyLock::new(|| pattern(r"\buseTheme\s*\("));
static HAPTICS: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bhaptics?\b"));
static ON_SKIP: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bonSkip\b"));
static SAFE_AREA: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bSafeAreaView\b|\buseSafeAreaInsets\s*\("));

pub(crate) fn default_export(source: &str) -> ValidationResult {
    if exports_callable(source) || NAMED_AS_DEFAULT.is_match(source) {
        ValidationResult::success(CHECK_DEFAULT_EXPORT, "Default export found")
    } else if ANY_DEFAULT.is_match(source) {
        ValidationResult::error(
            CHECK_DEFAULT_EXPORT,
            "Default export must be a component function or class",
        )
    } else {
        ValidationResult::error(CHECK_DEFAULT_EXPORT, "Missing default export")
    }
}

fn exports_callable(source: &str) -> bool {
    DEFAULT_TARGET
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .any(|target| !NOT_CALLABLE.contains(&target.as_str()))
}

pub(crate) fn on_complete(source: &str) -> ValidationResult {
    if ON_COMPLETE_CALL.is_match(source) {
        ValidationResult::success(CHECK_ON_COMPLETE, "Calls onComplete")
    } else {
        ValidationResult::error(
            CHECK_ON_COMPLETE,
            "Component never calls onComplete; the Flow would stall",
        )
    }
}

pub(crate) fn advisories(source: &str) -> Vec<ValidationResult> {
    [
        (
            CHECK_THEME,
            &*USE_THEME,
            "Uses useTheme",
            "Consider useTheme so colors follow light and dark mode",
        ),
        (
            CHECK_HAPTICS,
            &*HAPTICS,
            "Uses haptic feedback",
            "Consider haptic feedback on key interactions",
        ),
        (
            CHECK_SKIP,
            &*ON_SKIP,
            "Supports onSkip",
            "Consider supporting onSkip so users can move on",
        ),
        (
            CHECK_SAFE_AREA,
            &*SAFE_AREA,
            "Handles safe area",
            "Consider safe-area handling for notched devices",
        ),
    ]
    .into_iter()
    .map(|(check, regex, found, missing)| {
        if regex.is_match(source) {
            ValidationResult::success(check, found)
        } else {
            ValidationResult::warning(check, missing)
        }
    })
    .collect()
}

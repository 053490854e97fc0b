//! Configuration constants for document assembly
//!
//! Centralized configuration values used throughout the crate for:
//! - Rendering defaults (line width, overflow message, file extension)
//! - Conventional bundle roles
//! - Resource limits on declarative definitions and value lookup
//!
//! These are compile-time constants. Documents override the overflow message
//! per instance; everything else applies crate-wide.

/// Default number of characters per printed line in a form field.
///
/// Used to estimate how many lines a multi-line field can hold when line
/// breaks are preserved.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Default text appended to a truncated field value on the primary form.
pub const DEFAULT_OVERFLOW_MESSAGE: &str = "... (continued in addendum)";

/// File extension of combined output artifacts.
pub const PDF_EXTENSION: &str = "pdf";

/// Conventional role of the bundle filed with the court.
pub const COURT_BUNDLE: &str = "court_bundle";

/// Conventional role of the bundle handed to the user.
pub const USER_BUNDLE: &str = "user_bundle";

/// Maximum YAML definition size in bytes (1 MB).
///
/// A definition only lists documents, bundles and field triggers; real
/// interviews stay in the tens of kilobytes.
pub const MAX_YAML_SIZE: usize = 1_000_000;

/// Maximum nesting depth of bundles inside bundles.
///
/// Declarative definitions deeper than this are rejected when built.
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// Maximum number of bundles and documents expanded while building one
/// definition.
///
/// A bundle referenced several times is copied into each parent, so shared
/// bundles multiply per level. The depth limit alone does not bound that.
pub const MAX_BUNDLE_NODES: usize = 10_000;

/// Maximum recursion depth for dot notation property access in the value store.
///
/// Prevents stack overflow on input like "a.a.a.a.a...".
pub const MAX_PROPERTY_DEPTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reasonable() {
        assert!(DEFAULT_LINE_WIDTH >= 20, "Lines should fit some words");
        assert!(DEFAULT_LINE_WIDTH <= 200, "Lines should fit on a page");

        assert!(!DEFAULT_OVERFLOW_MESSAGE.is_empty());
        assert!(!PDF_EXTENSION.starts_with('.'));
        assert_ne!(COURT_BUNDLE, USER_BUNDLE);

        assert!(MAX_YAML_SIZE >= 100_000, "Should allow at least 100KB");
        assert!(MAX_YAML_SIZE <= 10_000_000, "Should not allow 10MB+");

        assert!(MAX_BUNDLE_DEPTH >= 4, "Should allow typical nesting");
        assert!(MAX_BUNDLE_DEPTH <= 100, "Should limit deep nesting");

        assert!(MAX_BUNDLE_NODES >= 1_000, "Should allow large interviews");
        assert!(MAX_BUNDLE_NODES <= 1_000_000, "Should limit shared bundle fan-out");

        assert!(MAX_PROPERTY_DEPTH >= 10, "Should allow nested objects");
        assert!(MAX_PROPERTY_DEPTH <= 100, "Should limit extreme depth");
    }
}

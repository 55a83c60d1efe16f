//! Accumulating validation results.
//!
//! A `ValidationResult` collects errors, warnings and informational notes.
//! Validity starts true and can only ever be cleared: there is no way to put
//! an invalid result back into a valid state.

use core::fmt;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// A pristine, valid result with no messages.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// A result carrying a single structural error.
    pub fn with_error(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.add_error(message);
        result
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    /// Fold another result into this one: lists are concatenated, validity is
    /// the conjunction of both.
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// True when nothing at all has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.info.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} errors, {} warnings, {} info)",
            if self.is_valid { "valid" } else { "invalid" },
            self.errors.len(),
            self.warnings.len(),
            self.info.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_clears_validity_for_good() {
        let mut r = ValidationResult::new();
        assert!(r.is_valid());
        r.add_warning("long duct");
        r.add_info("two sources");
        assert!(r.is_valid());
        r.add_error("missing segment");
        assert!(!r.is_valid());
        r.merge(ValidationResult::new());
        assert!(!r.is_valid());
        assert_eq!(r.errors(), &["missing segment".to_string()]);
    }

    #[test]
    fn merge_concatenates_in_order() {
        let mut a = ValidationResult::new();
        a.add_warning("w1");
        let mut b = ValidationResult::new();
        b.add_warning("w2");
        b.add_error("e1");
        a.merge(b);
        assert_eq!(a.warnings(), &["w1".to_string(), "w2".to_string()]);
        assert_eq!(a.errors().len(), 1);
        assert!(!a.is_valid());
    }

    #[test]
    fn display_summarises_counts() {
        let r = ValidationResult::with_error("x");
        assert_eq!(r.to_string(), "invalid (1 errors, 0 warnings, 0 info)");
    }
}

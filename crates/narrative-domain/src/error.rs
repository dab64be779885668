//! Validation errors for domain values

use thiserror::Error;

/// Errors raised when a domain value violates one of its bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A numeric field is outside its allowed range
    #[error("{field} out of range for '{owner}': {value} (expected {expected})")]
    OutOfRange {
        /// Id of the entity that owns the field
        owner: String,
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
        /// Human-readable bound, e.g. "[0, 100]"
        expected: &'static str,
    },

    /// A required text field is empty
    #[error("{field} must not be empty (owner: '{owner}')")]
    Empty {
        /// Id of the entity that owns the field
        owner: String,
        /// Field name
        field: &'static str,
    },
}

impl DomainError {
    pub(crate) fn out_of_range(
        owner: impl Into<String>,
        field: &'static str,
        value: f64,
        expected: &'static str,
    ) -> Self {
        DomainError::OutOfRange {
            owner: owner.into(),
            field,
            value,
            expected,
        }
    }
}

/// Check that `value` is finite and lies in `[min, max]`
pub(crate) fn check_range(
    owner: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), DomainError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::out_of_range(owner, field, value, expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_accepts_bounds() {
        assert!(check_range("n", "weight", 0.0, 0.0, 1.0, "[0, 1]").is_ok());
        assert!(check_range("n", "weight", 1.0, 0.0, 1.0, "[0, 1]").is_ok());
    }

    #[test]
    fn test_check_range_rejects_nan() {
        let err = check_range("n", "weight", f64::NAN, 0.0, 1.0, "[0, 1]").unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange { field: "weight", .. }));
    }

    #[test]
    fn test_error_message() {
        let err = DomainError::out_of_range("ai-capex", "score", 120.0, "[0, 100]");
        assert_eq!(
            err.to_string(),
            "score out of range for 'ai-capex': 120 (expected [0, 100])"
        );
    }
}

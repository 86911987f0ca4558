// src/error.rs
use thiserror::Error;

/// Error types for the fast-cir library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdeError {
    /// A parameter or draw array cannot be broadcast to the path grid
    #[error("Shape mismatch for '{parameter}': expected {expected}, found {found}")]
    ShapeMismatch {
        parameter: String,
        expected: String,
        found: String,
    },

    /// Invalid parameter values (only raised under strict validation)
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },
}

/// Result type alias for fast-cir operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> SdeResult<()> {
        if paths == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "n_paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SdeResult<()> {
        if steps == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "n_steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("kappa", 1.0).is_ok());
        assert!(validate_positive("kappa", 0.0).is_err());
        assert!(validate_positive("kappa", -0.5).is_err());
        assert!(validate_positive("kappa", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("x0", 0.0).is_ok());
        assert!(validate_non_negative("x0", 0.04).is_ok());
        assert!(validate_non_negative("x0", -1e-12).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_steps(1).is_ok());

        match validate_paths(0) {
            Err(SdeError::InvalidConfiguration { field, .. }) => assert_eq!(field, "n_paths"),
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
        match validate_steps(0) {
            Err(SdeError::InvalidConfiguration { field, .. }) => assert_eq!(field, "n_steps"),
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let error = SdeError::ShapeMismatch {
            parameter: "kappa".to_string(),
            expected: "scalar or 4 values".to_string(),
            found: "3 values".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("kappa"));
        assert!(display.contains("4 values"));
        assert!(display.contains("3 values"));

        let error = SdeError::InvalidParameters {
            parameter: "sigma".to_string(),
            value: -0.1,
            constraint: "must be non-negative".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
    }
}

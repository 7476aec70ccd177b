use crate::utils::error::{FarmError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Letters, then an optional numeric suffix that may be preceded by one space.
const PADDOCK_NAME_PATTERN: &str = r"^[A-Za-z]+(?: ?[0-9]+)?$";

fn paddock_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PADDOCK_NAME_PATTERN).expect("paddock name pattern compiles"))
}

pub fn validate_paddock_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| FarmError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.trim() != name {
        return Err(invalid("name cannot start or end with whitespace"));
    }
    if name.contains("  ") {
        return Err(invalid("name cannot contain consecutive spaces"));
    }
    if !paddock_name_regex().is_match(name) {
        return Err(invalid(
            "name must be letters, optionally followed by a number at the end",
        ));
    }
    Ok(())
}

/// Rejects zero, negative and non-finite values.
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FarmError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FarmError::ConfigError {
            message: format!("{} must be zero or more, got {}", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(FarmError::ConfigError {
            message: format!("{} cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(FarmError::ConfigError {
            message: format!("{} contains null bytes", field_name),
        });
    }

    Ok(())
}

/// Compares within the tolerance used to detect no-op paddock edits.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paddock_names() {
        for name in ["Bar", "Bar11", "Bar 11", "Hill 2", "A"] {
            assert!(validate_paddock_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_paddock_names() {
        for name in [
            "", "11Bar", "Bar-", "Bar.", " Bar", "Bar ", "Bar  11", "Bar 11a", "Bar 1 1",
            "Top Flat", "River Flat 3", "A B C D",
        ] {
            assert!(
                matches!(validate_paddock_name(name), Err(FarmError::InvalidName { .. })),
                "{name:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_name_reasons_follow_check_order() {
        let err = validate_paddock_name(" Bar").unwrap_err();
        assert!(err.to_string().contains("whitespace"));

        let err = validate_paddock_name("Bar  11").unwrap_err();
        assert!(err.to_string().contains("consecutive spaces"));

        let err = validate_paddock_name("Bar-").unwrap_err();
        assert!(err.to_string().contains("letters"));
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("area", 0.5).is_ok());
        assert!(validate_positive("area", 0.0).is_err());
        assert!(validate_positive("area", -3.0).is_err());
        assert!(validate_positive("area", f64::NAN).is_err());
        assert!(validate_positive("area", f64::INFINITY).is_err());
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(10.0, 10.005, 0.01));
        assert!(!approx_eq(10.0, 10.02, 0.01));
    }
}

//! Required-field and range checks over a submitted employee form.
//!
//! Pure functions: no database lookups, no cross-field rules. All failing
//! fields are reported in one pass so a form round-trip fixes everything at
//! once.

use serde::Serialize;

use crate::models::forms::EmployeeSubmission;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;

/// A single rejected field and the reason it was rejected.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// The validated name/salary pair a handler is allowed to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEmployee {
    pub name: String,
    pub salary: f64,
}

/// Check a submission against the field rules.
///
/// Presence is judged from the parsed form, not from the value, so a salary
/// of exactly zero passes; only an omitted or non-numeric salary field is an
/// error.
pub fn validate_submission(
    submission: &EmployeeSubmission,
) -> Result<ValidatedEmployee, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = match submission.name.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("name", "name is required"));
            None
        }
        Some(name) if name.chars().count() < NAME_MIN_LEN => {
            errors.push(FieldError::new(
                "name",
                format!("name must be at least {NAME_MIN_LEN} characters"),
            ));
            None
        }
        Some(name) if name.chars().count() > NAME_MAX_LEN => {
            errors.push(FieldError::new(
                "name",
                format!("name must be at most {NAME_MAX_LEN} characters"),
            ));
            None
        }
        Some(name) => Some(name.to_string()),
    };

    let salary = match submission.salary {
        None => {
            let reason = match submission.salary_raw.as_deref().map(str::trim) {
                None | Some("") => "salary is required",
                Some(_) => "salary must be a number",
            };
            errors.push(FieldError::new("salary", reason));
            None
        }
        Some(salary) if !salary.is_finite() || salary < 0.0 => {
            errors.push(FieldError::new("salary", "salary must be non-negative"));
            None
        }
        Some(salary) => Some(salary),
    };

    match (name, salary) {
        (Some(name), Some(salary)) if errors.is_empty() => {
            Ok(ValidatedEmployee { name, salary })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::EmployeeSubmission;

    fn submission(name: Option<&str>, salary: Option<f64>) -> EmployeeSubmission {
        EmployeeSubmission {
            name: name.map(str::to_string),
            salary,
            salary_raw: salary.map(|s| s.to_string()),
            file: None,
        }
    }

    #[test]
    fn accepts_valid_submission() {
        let ok = validate_submission(&submission(Some("Alice"), Some(50_000.0))).unwrap();
        assert_eq!(ok.name, "Alice");
        assert_eq!(ok.salary, 50_000.0);
    }

    #[test]
    fn zero_salary_is_valid() {
        let ok = validate_submission(&submission(Some("Intern"), Some(0.0))).unwrap();
        assert_eq!(ok.salary, 0.0);
    }

    #[test]
    fn missing_salary_is_rejected() {
        let errors = validate_submission(&submission(Some("Alice"), None)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "salary");
    }

    #[test]
    fn negative_salary_is_rejected() {
        let errors = validate_submission(&submission(Some("Alice"), Some(-1.0))).unwrap_err();
        assert_eq!(errors[0].field, "salary");
    }

    #[test]
    fn name_length_bounds_are_inclusive() {
        assert!(validate_submission(&submission(Some("abc"), Some(1.0))).is_ok());
        assert!(validate_submission(&submission(Some(&"x".repeat(100)), Some(1.0))).is_ok());
        assert!(validate_submission(&submission(Some("ab"), Some(1.0))).is_err());
        assert!(validate_submission(&submission(Some(&"x".repeat(101)), Some(1.0))).is_err());
    }

    #[test]
    fn whitespace_only_name_counts_as_missing() {
        let errors = validate_submission(&submission(Some("   "), Some(1.0))).unwrap_err();
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].reason, "name is required");
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = validate_submission(&submission(None, Some(-5.0))).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "salary"]);
    }
}

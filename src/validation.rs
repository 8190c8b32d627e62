//! Input validation for fetched timeline data.
//!
//! Checks integrity of resources and operations as delivered by the read
//! collaborator. Detects:
//! - Duplicate resource external IDs and duplicate operation IDs
//! - Empty or inverted intervals (`end_time <= start_time`)
//! - `duration_minutes` disagreeing with the interval
//! - `percent_done` outside 0..=100
//! - Operations referencing resources that don't exist
//!
//! Problems are reported, never fatal: the view logs them and still
//! displays the data.

use crate::models::{Operation, Resource};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An operation ends at or before its start.
    InvalidTimeRange,
    /// `duration_minutes` does not match `end_time - start_time`.
    InconsistentDuration,
    /// `percent_done` is outside 0..=100.
    ProgressOutOfRange,
    /// An operation references a resource that doesn't exist.
    InvalidResourceReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates fetched resources and operations.
///
/// Checks:
/// 1. No duplicate resource external IDs
/// 2. No duplicate operation IDs
/// 3. `end_time > start_time` for every operation
/// 4. `duration_minutes` consistent with the interval
/// 5. `percent_done` within 0..=100
/// 6. Every assigned operation references an existing resource
///
/// Unassigned operations (`resource_id == None`) are valid.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(resources: &[Resource], operations: &[Operation]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.external_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.external_id),
            ));
        }
    }

    let mut operation_ids = HashSet::new();
    for op in operations {
        if !operation_ids.insert(op.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate operation ID: {}", op.id),
            ));
        }

        if op.end_time <= op.start_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Operation {} ends at {} which is not after its start {}",
                    op.id, op.end_time, op.start_time
                ),
            ));
        } else if !op.duration_is_consistent() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InconsistentDuration,
                format!(
                    "Operation {} has duration {} min but spans {} min",
                    op.id,
                    op.duration_minutes,
                    op.duration().num_minutes()
                ),
            ));
        }

        if !(0.0..=100.0).contains(&op.percent_done) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ProgressOutOfRange,
                format!("Operation {} has progress {}%", op.id, op.percent_done),
            ));
        }

        if let Some(rid) = &op.resource_id {
            if !resource_ids.contains(rid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Operation {} references unknown resource '{}'", op.id, rid),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, hour, 0, 0).unwrap()
    }

    fn sample_resources() -> Vec<Resource> {
        vec![Resource::new(1, "R1"), Resource::new(2, "R2")]
    }

    fn sample_operations() -> Vec<Operation> {
        vec![
            Operation::new(1, "Boil", at(9), at(11)).on_resource("R1"),
            Operation::new(2, "Mash", at(10), at(12)).on_resource("R2"),
            Operation::new(3, "Clean", at(12), at(13)),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_resources(), &sample_operations()).is_ok());
    }

    #[test]
    fn test_duplicate_resource_id() {
        let resources = vec![Resource::new(1, "R1"), Resource::new(9, "R1")];
        let errors = validate_input(&resources, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_duplicate_operation_id() {
        let mut ops = sample_operations();
        ops.push(Operation::new(1, "Again", at(14), at(15)));
        let errors = validate_input(&sample_resources(), &ops).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("operation")));
    }

    #[test]
    fn test_inverted_interval() {
        let ops = vec![Operation::new(1, "Backwards", at(11), at(9)).on_resource("R1")];
        let errors = validate_input(&sample_resources(), &ops).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTimeRange);
    }

    #[test]
    fn test_inconsistent_duration() {
        let mut op = Operation::new(1, "Boil", at(9), at(11)).on_resource("R1");
        op.duration_minutes = 90;
        let errors = validate_input(&sample_resources(), &[op]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InconsistentDuration);
    }

    #[test]
    fn test_progress_out_of_range() {
        let mut op = Operation::new(1, "Boil", at(9), at(11)).on_resource("R1");
        op.percent_done = 120.0;
        let errors = validate_input(&sample_resources(), &[op]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::ProgressOutOfRange);
    }

    #[test]
    fn test_unknown_resource_reference() {
        let ops = vec![Operation::new(1, "Ghost", at(9), at(10)).on_resource("R9")];
        let errors = validate_input(&sample_resources(), &ops).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidResourceReference);
        assert!(errors[0].message.contains("R9"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad = Operation::new(1, "Bad", at(11), at(9)).on_resource("R9");
        bad.percent_done = -5.0;
        let errors = validate_input(&sample_resources(), &[bad]).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}

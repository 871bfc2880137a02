//! Garde validation utilities.

use crate::domain::DomainError;
use garde::{Report, Validate};

/// Convert garde validation report to DomainError
pub fn validate_struct<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationError(format_validation_errors(&report)))
}

/// Format validation errors from garde Report into a human-readable string
fn format_validation_errors(report: &Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            if path.to_string().is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventRequest;

    fn request(organization_id: &str, event_id: &str) -> EventRequest {
        EventRequest {
            organization_id: organization_id.to_string(),
            event_id: event_id.to_string(),
            record_ids: vec!["003A".to_string()],
            namespace: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_struct(&request("00Dxx", "e1")).is_ok());
    }

    #[test]
    fn test_missing_event_id_fails() {
        let result = validate_struct(&request("00Dxx", ""));
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_error_message_names_the_field() {
        let result = validate_struct(&request("", "e1"));
        if let Err(DomainError::ValidationError(msg)) = result {
            assert!(msg.contains("organization_id"));
        } else {
            panic!("Expected ValidationError");
        }
    }
}

//! Request and response DTOs.

pub mod request;
pub mod response;

use lifelink_core::error::AppError;
use validator::{Validate, ValidationErrors};

/// Run validator-derive checks, flattening field errors into one message.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(flatten_errors)
}

fn flatten_errors(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field}: {detail}")
        })
        .collect();
    fields.sort();
    AppError::validation(format!("Validation failed: {}", fields.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(range(min = 1, message = "must be positive"))]
        units: i32,
    }

    #[test]
    fn test_flattened_message_names_fields() {
        let probe = Probe {
            name: String::new(),
            units: 0,
        };
        let err = validate_payload(&probe).unwrap_err();
        assert!(err.message.contains("name"));
        assert!(err.message.contains("units"));
    }
}

use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;

/// Reject a form body whose required fields are missing, null or blank
pub fn require_fields(body: &Value, fields: &[&str]) -> Result<(), ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::validation_error("Request body must be a JSON object", None))?;

    let mut field_errors = HashMap::new();
    for field in fields {
        let present = match object.get(*field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        };
        if !present {
            field_errors.insert(field.to_string(), "This field is required".to_string());
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Missing required fields", Some(field_errors)))
    }
}

/// Reject a value whose confirmation does not match
pub fn confirm_matches(field: &str, value: &str, confirmation: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), "This field is required".to_string());
        return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
    }

    if value != confirmation {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            format!("{}Confirmation", field),
            format!("Does not match {}", field),
        );
        return Err(ApiError::validation_error("Confirmation does not match", Some(field_errors)));
    }

    Ok(())
}

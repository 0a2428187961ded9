//! The JSON envelope every API response is wrapped in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name -> validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const SUCCESS: &str = "Success";

/// `{message, data?, errors?}`.
///
/// `data` is omitted when there is nothing to return; `errors` is only
/// present on validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    /// `{"message": "Success", "data": ...}`
    pub fn success(data: T) -> Self {
        Self {
            message: SUCCESS.to_string(),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope {
    /// Message only, no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            message: "Validation errors".to_string(),
            data: None,
            errors: Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_only_omits_data_and_errors() {
        let value = serde_json::to_value(Envelope::message(SUCCESS)).unwrap();
        assert_eq!(value, json!({"message": "Success"}));
    }

    #[test]
    fn test_validation_envelope() {
        let errors = FieldErrors::from([(
            "title".to_string(),
            vec!["The title field is required.".to_string()],
        )]);
        let value = serde_json::to_value(Envelope::validation(errors)).unwrap();

        assert_eq!(
            value,
            json!({
                "message": "Validation errors",
                "errors": {"title": ["The title field is required."]}
            })
        );
    }
}

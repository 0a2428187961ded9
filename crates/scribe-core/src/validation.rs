//! Input validation for post forms.
//!
//! Rules: `title` is required, a string and at most 255 characters;
//! `content` is required and a string. Failures are reported per field
//! as human readable messages.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// Field name -> messages, as rendered in a 422 response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const TITLE_MAX_CHARS: usize = 255;

/// A submitted form value before any rule has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Missing,
    Text(String),
    /// Present but not a string (e.g. a JSON number or object).
    NotText,
}

impl FieldValue {
    /// Trimmed text; blank input counts as missing.
    pub fn text(value: &str) -> Self {
        match value.trim() {
            "" => Self::Missing,
            trimmed => Self::Text(trimmed.to_string()),
        }
    }

    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(s)) => Self::text(s),
            Some(_) => Self::NotText,
        }
    }
}

/// Interpret a checkbox-style form value.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

pub fn flag_from_json(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => parse_flag(s),
        _ => false,
    }
}

/// Raw create/update input as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    pub title: FieldValue,
    pub content: FieldValue,
    pub is_published: bool,
}

/// Input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub content: String,
    pub is_published: bool,
}

impl PostInput {
    pub fn new(title: &str, content: &str, is_published: bool) -> Self {
        Self {
            title: FieldValue::text(title),
            content: FieldValue::text(content),
            is_published,
        }
    }

    /// Build from a JSON object body.
    pub fn from_json(body: &serde_json::Map<String, Value>) -> Self {
        Self {
            title: FieldValue::from_json(body.get("title")),
            content: FieldValue::from_json(body.get("content")),
            is_published: flag_from_json(body.get("is_published")),
        }
    }

    fn check(&self) -> (Option<&str>, Option<&str>, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let title = match required_string(&self.title, "title", Some(TITLE_MAX_CHARS)) {
            Ok(title) => Some(title),
            Err(e) => {
                errors.add("title", e);
                None
            }
        };
        let content = match required_string(&self.content, "content", None) {
            Ok(content) => Some(content),
            Err(e) => {
                errors.add("content", e);
                None
            }
        };

        (title, content, errors)
    }

    /// Validate and convert into the typed form the service works with.
    pub fn into_valid(self) -> Result<ValidPost, ValidationErrors> {
        let (title, content, errors) = self.check();
        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(ValidPost {
                title: title.to_string(),
                content: content.to_string(),
                is_published: self.is_published,
            }),
            _ => Err(errors),
        }
    }
}

impl Validate for PostInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let (_, _, errors) = self.check();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn required_string<'a>(
    value: &'a FieldValue,
    field: &str,
    max: Option<usize>,
) -> Result<&'a str, ValidationError> {
    match value {
        FieldValue::Missing => Err(rule_error(
            "required",
            format!("The {field} field is required."),
        )),
        FieldValue::NotText => Err(rule_error(
            "string",
            format!("The {field} field must be a string."),
        )),
        FieldValue::Text(text) => match max {
            Some(max) if text.chars().count() > max => {
                let mut err = rule_error(
                    "max",
                    format!("The {field} field must not be greater than {max} characters."),
                );
                err.add_param(Cow::from("max"), &max);
                Err(err)
            }
            _ => Ok(text),
        },
    }
}

/// Build a validation error carrying a rendered message.
pub fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// `max` rule failure for a cover larger than `max_bytes`.
pub fn cover_too_large(max_bytes: usize) -> ValidationError {
    rule_error(
        "max",
        format!(
            "The cover field must not be greater than {} kilobytes.",
            max_bytes / 1024
        ),
    )
}

/// Flatten `ValidationErrors` into the field -> messages map.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("The {field} field is invalid."),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

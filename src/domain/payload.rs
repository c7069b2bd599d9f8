use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A single validated field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

/// Validated, submission-ready field set.
///
/// Only `FormSchema::validate` builds one, and only when every rule passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: BTreeMap<String, FieldValue>,
}

impl FormPayload {
    pub(crate) fn from_fields(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::Text(text) => Value::String(text.clone()),
                    FieldValue::Flag(flag) => Value::Bool(*flag),
                    FieldValue::List(items) => {
                        Value::Array(items.iter().cloned().map(Value::String).collect())
                    }
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// Deserializes the payload into a typed view such as `ProfileSettings`.
    pub fn to_typed<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required")]
    Required,

    #[error("Expected {expected}, received {received}")]
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },

    #[error("String must contain at most {max} character(s)")]
    TooLong { max: usize },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid url")]
    InvalidUrl,

    #[error("Invalid option. Expected {expected}, received '{received}'")]
    InvalidOption { expected: String, received: String },

    #[error("Number must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
}

/// Per-field errors from a rejected submission, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.errors.len())?;
        for (field, error) in &self.errors {
            write!(f, "\n  {}: {}", field, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl FieldErrors {
    pub(crate) fn from_errors(errors: BTreeMap<String, ValidationError>) -> Self {
        Self { errors }
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (field.as_str(), error))
    }

    /// Human-readable message per field, as shown inline next to each input.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.clone(), error.to_string()))
            .collect()
    }
}

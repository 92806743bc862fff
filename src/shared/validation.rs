//! Request Input Validation
//!
//! Field-level validation for JSON request bodies. Request types keep their
//! fields as raw `serde_json::Value`s so that a missing field, a `null`, or a
//! value of the wrong type all surface as per-field validation messages instead
//! of a deserialization failure.
//!
//! # Example
//!
//! ```rust
//! use masagena::shared::validation::Validator;
//! use serde_json::json;
//!
//! let body = json!({ "email": "not-an-email" });
//! let mut validator = Validator::new();
//! let email = validator.email("email", body.get("email"));
//! let password = validator.string("password", body.get("password"));
//! assert!(email.is_none() && password.is_none());
//!
//! let errors = validator.finish().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// A single failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the request field
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// Ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message of the first failed rule, if any
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// First message followed by a count of the remaining ones,
    /// e.g. `The email field is required. (and 1 more error)`.
    pub fn summary(&self) -> String {
        let Some(first) = self.first_message() else {
            return "The given data was invalid.".to_string();
        };

        match self.errors.len() - 1 {
            0 => first.to_string(),
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    /// Messages grouped by field, in field-name order
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field errors while extracting typed values
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a present, non-blank value.
    ///
    /// `null` and whitespace-only strings count as missing.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a Value>) -> Option<&'a Value> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
        .or_else(|| {
            self.errors
                .add(field, format!("The {} field is required.", field));
            None
        })
    }

    /// Require a present string value
    pub fn string<'a>(&mut self, field: &str, value: Option<&'a Value>) -> Option<&'a str> {
        let value = self.required(field, value)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.errors
                    .add(field, format!("The {} field must be a string.", field));
                None
            }
        }
    }

    /// Require a present, well-formed email address
    pub fn email<'a>(&mut self, field: &str, value: Option<&'a Value>) -> Option<&'a str> {
        let value = self.required(field, value)?;
        match value.as_str().map(str::trim) {
            Some(s) if EMAIL_PATTERN.is_match(s) => Some(s),
            _ => {
                self.errors.add(
                    field,
                    format!("The {} field must be a valid email address.", field),
                );
                None
            }
        }
    }

    /// Finish validation, returning the collected errors if any rule failed
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

//! Validation error taxonomy
//!
//! Validation never stops at the first defect. Every problem becomes a
//! [`FieldError`] addressed by its field path, and the whole set is
//! surfaced as one [`ValidationErrors`] rejection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a field-level defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unrecognized categorical value
    InvalidEnum,
    /// Numeric or version value outside catalog bounds
    OutOfRange,
    /// Name is not unique within its scope
    DuplicateName,
    /// Authorization rule grants no capability
    InvalidRule,
    /// Value is not an ISO-8601 duration
    MalformedDuration,
    /// Required value is missing or empty
    Required,
    /// Name does not follow provider naming rules
    InvalidName,
    /// Setting is not available on the selected tier
    UnsupportedByTier,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidEnum => "invalid_enum",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::InvalidRule => "invalid_rule",
            ErrorKind::MalformedDuration => "malformed_duration",
            ErrorKind::Required => "required",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::UnsupportedByTier => "unsupported_by_tier",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path, e.g. `queues[0].authorization_rules[1].name`
    pub field: String,

    /// Defect category
    pub kind: ErrorKind,

    /// Human-readable detail
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.kind, self.message)
    }
}

/// The complete defect set of a rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors reported against exactly `field`
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Whether any error matches both `field` and `kind`
    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.for_field(field).any(|e| e.kind == kind)
    }

    /// Whether any error, on any field, has `kind`
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid configuration: {} field error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

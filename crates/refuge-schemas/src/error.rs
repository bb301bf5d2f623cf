//! Error types for `refuge-schemas`.

use std::fmt;

use thiserror::Error;

use crate::value::FieldType;

// ─── Validation ──────────────────────────────────────────────────────────────

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
  /// A required field was not supplied at all.
  Missing,
  /// The field was supplied but could not be coerced to its declared type.
  TypeMismatch {
    expected: FieldType,
    /// Description of the offending value, e.g. `text "abc"`.
    found:    String,
  },
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: String,
  pub kind:  FieldErrorKind,
}

impl FieldError {
  pub fn missing(field: impl Into<String>) -> Self {
    Self { field: field.into(), kind: FieldErrorKind::Missing }
  }

  pub fn type_mismatch(
    field: impl Into<String>,
    expected: FieldType,
    found: impl Into<String>,
  ) -> Self {
    Self {
      field: field.into(),
      kind:  FieldErrorKind::TypeMismatch { expected, found: found.into() },
    }
  }

  pub fn is_missing(&self) -> bool {
    matches!(self.kind, FieldErrorKind::Missing)
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      FieldErrorKind::Missing => write!(f, "{}: field required", self.field),
      FieldErrorKind::TypeMismatch { expected, found } => {
        write!(f, "{}: expected {expected}, found {found}", self.field)
      }
    }
  }
}

/// Every field failure collected while validating one model, in declared
/// field order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} for {model}: {}", count_label(.errors.len()), join(.errors))]
pub struct ValidationError {
  pub model:  &'static str,
  pub errors: Vec<FieldError>,
}

impl ValidationError {
  /// The failure recorded for `field`, if any.
  pub fn get(&self, field: &str) -> Option<&FieldError> {
    self.errors.iter().find(|e| e.field == field)
  }

  /// Names of the failing fields, in order.
  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.errors.iter().map(|e| e.field.as_str())
  }
}

fn count_label(n: usize) -> String {
  if n == 1 {
    "1 validation error".to_owned()
  } else {
    format!("{n} validation errors")
  }
}

fn join(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

// ─── Crate error ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

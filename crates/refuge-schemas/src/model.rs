//! The [`Model`] trait, its static field tables, and the [`Validator`] that
//! collects every field failure before giving up.

use crate::{
  Result,
  error::{FieldError, ValidationError},
  settings::ValidationSettings,
  source::FieldSource,
  value::{Coerce, FieldMap, FieldType, FieldValue},
};

/// Name reported when a JSON document is not an object at all.
pub const ROOT_FIELD: &str = "__root__";

// ─── Field tables ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  Required,
  /// Absent or null input leaves the field unset.
  Optional,
}

/// One declared field of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub name:     &'static str,
  pub ty:       FieldType,
  pub presence: Presence,
}

impl FieldSpec {
  pub const fn required(name: &'static str, ty: FieldType) -> Self {
    Self { name, ty, presence: Presence::Required }
  }

  pub const fn optional(name: &'static str, ty: FieldType) -> Self {
    Self { name, ty, presence: Presence::Optional }
  }

  pub fn is_required(&self) -> bool { self.presence == Presence::Required }
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// A validated, immutable record shape.
///
/// Every model is itself a [`FieldSource`], so a value can be fed back into
/// [`Model::validate`] and comes out equal.
pub trait Model: Sized + FieldSource {
  /// Name used in error reports.
  const NAME: &'static str;

  /// Declared fields, in validation order.
  const FIELDS: &'static [FieldSpec];

  /// Validate `source` and build the model, or report every failing field.
  fn validate_with<S: FieldSource + ?Sized>(
    source: &S,
    settings: &ValidationSettings,
  ) -> Result<Self, ValidationError>;

  /// [`Model::validate_with`] using default (lax) settings.
  fn validate<S: FieldSource + ?Sized>(
    source: &S,
  ) -> Result<Self, ValidationError> {
    Self::validate_with(source, &ValidationSettings::default())
  }

  /// Every declared field with its current value; unset optionals are
  /// [`FieldValue::Null`].
  fn to_fields(&self) -> FieldMap {
    Self::FIELDS
      .iter()
      .map(|spec| {
        let value = self.field(spec.name).unwrap_or(FieldValue::Null);
        (spec.name.to_owned(), value)
      })
      .collect()
  }

  /// Validate a JSON value. Anything other than an object is rejected as a
  /// whole under [`ROOT_FIELD`].
  fn from_json_value(
    value: serde_json::Value,
  ) -> Result<Self, ValidationError> {
    match value {
      serde_json::Value::Object(map) => Self::validate(&map),
      other => Err(ValidationError {
        model:  Self::NAME,
        errors: vec![FieldError::type_mismatch(
          ROOT_FIELD,
          FieldType::Object,
          FieldValue::from(other).describe(),
        )],
      }),
    }
  }

  /// Parse and validate a JSON document.
  fn parse_json(json: &str) -> Result<Self> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(Self::from_json_value(value)?)
  }
}

/// Models that may be built straight from a persistence-layer object by
/// reading its same-named members.
pub trait OrmMode: Model {
  fn from_object<O: FieldSource + ?Sized>(
    obj: &O,
  ) -> Result<Self, ValidationError> {
    Self::from_object_with(obj, &ValidationSettings::default())
  }

  fn from_object_with<O: FieldSource + ?Sized>(
    obj: &O,
    settings: &ValidationSettings,
  ) -> Result<Self, ValidationError> {
    tracing::trace!(model = Self::NAME, "building from object");
    Self::validate_with(obj, settings)
  }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Reads fields from a source one at a time, recording failures instead of
/// stopping at the first.
///
/// ```rust,ignore
/// let mut v = Validator::new::<Self>(source, settings);
/// let label: Option<String> = v.required("label");
/// v.finish(|| Some(Self { label: label? }))
/// ```
pub struct Validator<'a, S: ?Sized> {
  model:    &'static str,
  fields:   &'static [FieldSpec],
  source:   &'a S,
  settings: &'a ValidationSettings,
  errors:   Vec<FieldError>,
}

impl<'a, S: FieldSource + ?Sized> Validator<'a, S> {
  pub fn new<M: Model>(
    source: &'a S,
    settings: &'a ValidationSettings,
  ) -> Self {
    Self {
      model: M::NAME,
      fields: M::FIELDS,
      source,
      settings,
      errors: Vec::new(),
    }
  }

  /// Read a required field. `None` means the failure has been recorded.
  pub fn required<T: Coerce>(&mut self, name: &'static str) -> Option<T> {
    self.check_declared::<T>(name, Presence::Required);
    match self.source.field(name) {
      None => {
        self.errors.push(FieldError::missing(name));
        None
      }
      Some(value) => self.coerce(name, &value),
    }
  }

  /// Read an optional field. Absent and null both yield `None` without
  /// recording anything.
  pub fn optional<T: Coerce>(&mut self, name: &'static str) -> Option<T> {
    self.check_declared::<T>(name, Presence::Optional);
    match self.source.field(name) {
      None | Some(FieldValue::Null) => None,
      Some(value) => self.coerce(name, &value),
    }
  }

  /// Build the model if no failures were recorded.
  pub fn finish<M>(
    self,
    build: impl FnOnce() -> Option<M>,
  ) -> Result<M, ValidationError> {
    if self.errors.is_empty()
      && let Some(model) = build()
    {
      tracing::trace!(model = self.model, "validated");
      return Ok(model);
    }

    let error = ValidationError { model: self.model, errors: self.errors };
    tracing::debug!(
      model = error.model,
      count = error.errors.len(),
      %error,
      "validation failed"
    );
    Err(error)
  }

  fn coerce<T: Coerce>(
    &mut self,
    name: &'static str,
    value: &FieldValue,
  ) -> Option<T> {
    let coerced = if value.is_null() {
      None
    } else {
      T::coerce(value, self.settings)
    };
    if coerced.is_none() {
      self
        .errors
        .push(FieldError::type_mismatch(name, T::TYPE, value.describe()));
    }
    coerced
  }

  fn check_declared<T: Coerce>(&self, name: &str, presence: Presence) {
    debug_assert!(
      self
        .fields
        .iter()
        .any(|f| f.name == name
          && f.ty == T::TYPE
          && f.is_required() == (presence == Presence::Required)),
      "{}.{name} read as {presence:?} {} but not declared that way",
      self.model,
      T::TYPE,
    );
  }
}

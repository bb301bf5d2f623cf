//! Keyword lookup types.
//!
//! [`EquivalentKeyword`] maps a display label onto an underlying keyword
//! term. Its `keyword` is not checked against any [`Keyword`]; resolving that
//! relationship happens wherever the records are stored.

use serde::{Deserialize, Serialize};

use crate::{
  error::ValidationError,
  model::{FieldSpec, Model, OrmMode, Validator},
  settings::ValidationSettings,
  source::FieldSource,
  value::{FieldType, FieldValue},
};

// ─── EquivalentKeyword ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct EquivalentKeyword {
  label:   String,
  keyword: String,
}

impl EquivalentKeyword {
  pub fn label(&self) -> &str { &self.label }

  pub fn keyword(&self) -> &str { &self.keyword }
}

impl Model for EquivalentKeyword {
  const NAME: &'static str = "EquivalentKeyword";

  const FIELDS: &'static [FieldSpec] = &[
    FieldSpec::required("label", FieldType::Text),
    FieldSpec::required("keyword", FieldType::Text),
  ];

  fn validate_with<S: FieldSource + ?Sized>(
    source: &S,
    settings: &ValidationSettings,
  ) -> Result<Self, ValidationError> {
    let mut v = Validator::new::<Self>(source, settings);
    let label: Option<String> = v.required("label");
    let keyword: Option<String> = v.required("keyword");
    v.finish(|| Some(Self { label: label?, keyword: keyword? }))
  }
}

impl OrmMode for EquivalentKeyword {}

impl FieldSource for EquivalentKeyword {
  fn field(&self, name: &str) -> Option<FieldValue> {
    match name {
      "label" => Some(self.label.as_str().into()),
      "keyword" => Some(self.keyword.as_str().into()),
      _ => None,
    }
  }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for EquivalentKeyword {
  type Error = ValidationError;

  fn try_from(
    map: serde_json::Map<String, serde_json::Value>,
  ) -> Result<Self, Self::Error> {
    Self::validate(&map)
  }
}

// ─── Keyword ─────────────────────────────────────────────────────────────────

/// A single keyword term.
// TODO: restore `category` once its semantics (free text or a closed set,
// and its default) are settled; until then it is not part of the model and
// is ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct Keyword {
  label: String,
}

impl Keyword {
  pub fn label(&self) -> &str { &self.label }
}

impl Model for Keyword {
  const NAME: &'static str = "Keyword";

  const FIELDS: &'static [FieldSpec] =
    &[FieldSpec::required("label", FieldType::Text)];

  fn validate_with<S: FieldSource + ?Sized>(
    source: &S,
    settings: &ValidationSettings,
  ) -> Result<Self, ValidationError> {
    let mut v = Validator::new::<Self>(source, settings);
    let label: Option<String> = v.required("label");
    v.finish(|| Some(Self { label: label? }))
  }
}

impl OrmMode for Keyword {}

impl FieldSource for Keyword {
  fn field(&self, name: &str) -> Option<FieldValue> {
    (name == "label").then(|| self.label.as_str().into())
  }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Keyword {
  type Error = ValidationError;

  fn try_from(
    map: serde_json::Map<String, serde_json::Value>,
  ) -> Result<Self, Self::Error> {
    Self::validate(&map)
  }
}

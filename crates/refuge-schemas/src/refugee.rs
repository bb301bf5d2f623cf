//! [`Refugee`] — a person record as it crosses the persistence/API boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  error::ValidationError,
  model::{FieldSpec, Model, OrmMode, Validator},
  settings::ValidationSettings,
  source::FieldSource,
  value::{FieldType, FieldValue},
};

/// A person record. Uniqueness of `id` is the owning store's business.
///
/// Only obtainable through validation; all fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct Refugee {
  id:              i64,
  first_name:      String,
  family_name:     String,
  birth_date:      Option<NaiveDate>,
  salary_targeted: Option<i64>,
  email:           String,
  /// Delimiter-packed keyword list, kept as a single string.
  keywords:        String,
}

impl Refugee {
  pub fn id(&self) -> i64 { self.id }

  pub fn first_name(&self) -> &str { &self.first_name }

  pub fn family_name(&self) -> &str { &self.family_name }

  pub fn birth_date(&self) -> Option<NaiveDate> { self.birth_date }

  pub fn salary_targeted(&self) -> Option<i64> { self.salary_targeted }

  pub fn email(&self) -> &str { &self.email }

  pub fn keywords(&self) -> &str { &self.keywords }
}

impl Model for Refugee {
  const NAME: &'static str = "Refugee";

  const FIELDS: &'static [FieldSpec] = &[
    FieldSpec::required("id", FieldType::Integer),
    FieldSpec::required("first_name", FieldType::Text),
    FieldSpec::required("family_name", FieldType::Text),
    FieldSpec::optional("birth_date", FieldType::Date),
    FieldSpec::optional("salary_targeted", FieldType::Integer),
    FieldSpec::required("email", FieldType::Text),
    FieldSpec::required("keywords", FieldType::Text),
  ];

  fn validate_with<S: FieldSource + ?Sized>(
    source: &S,
    settings: &ValidationSettings,
  ) -> Result<Self, ValidationError> {
    let mut v = Validator::new::<Self>(source, settings);

    let id: Option<i64> = v.required("id");
    let first_name: Option<String> = v.required("first_name");
    let family_name: Option<String> = v.required("family_name");
    let birth_date: Option<NaiveDate> = v.optional("birth_date");
    let salary_targeted: Option<i64> = v.optional("salary_targeted");
    let email: Option<String> = v.required("email");
    let keywords: Option<String> = v.required("keywords");

    v.finish(|| {
      Some(Self {
        id: id?,
        first_name: first_name?,
        family_name: family_name?,
        birth_date,
        salary_targeted,
        email: email?,
        keywords: keywords?,
      })
    })
  }
}

impl OrmMode for Refugee {}

impl FieldSource for Refugee {
  fn field(&self, name: &str) -> Option<FieldValue> {
    Some(match name {
      "id" => self.id.into(),
      "first_name" => self.first_name.as_str().into(),
      "family_name" => self.family_name.as_str().into(),
      "birth_date" => self.birth_date.into(),
      "salary_targeted" => self.salary_targeted.into(),
      "email" => self.email.as_str().into(),
      "keywords" => self.keywords.as_str().into(),
      _ => return None,
    })
  }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Refugee {
  type Error = ValidationError;

  fn try_from(
    map: serde_json::Map<String, serde_json::Value>,
  ) -> Result<Self, Self::Error> {
    Self::validate(&map)
  }
}

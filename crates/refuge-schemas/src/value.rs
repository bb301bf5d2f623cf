//! Dynamic input values and the coercion rules that turn them into the
//! declared field types.
//!
//! A [`FieldValue`] is whatever a [`FieldSource`](crate::source::FieldSource)
//! hands out for a field name. Coercion is lax by default: an integer column
//! may arrive as text, a date as a Unix timestamp. Strict mode accepts only
//! the native variant for each type.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::settings::ValidationSettings;

/// Magnitudes above this are treated as milliseconds rather than seconds.
const MS_WATERSHED: f64 = 2e10;

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A single untyped value read from a mapping, a row, or an object.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Null,
  Bool(bool),
  Integer(i64),
  Float(f64),
  Text(String),
  Bytes(Vec<u8>),
  Date(NaiveDate),
  DateTime(NaiveDateTime),
  Array(Vec<FieldValue>),
  Object(BTreeMap<String, FieldValue>),
}

/// An owned snapshot of named values; the "dict" view of a model.
pub type FieldMap = BTreeMap<String, FieldValue>;

impl FieldValue {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Short description used in type-mismatch reports, e.g. `float 3.5`.
  pub fn describe(&self) -> String {
    match self {
      Self::Null => "null".to_owned(),
      Self::Bool(b) => format!("boolean {b}"),
      Self::Integer(i) => format!("integer {i}"),
      Self::Float(f) => format!("float {f}"),
      Self::Text(s) => format!("text {s:?}"),
      Self::Bytes(b) => format!("{} bytes", b.len()),
      Self::Date(d) => format!("date {d}"),
      Self::DateTime(dt) => format!("datetime {dt}"),
      Self::Array(items) => format!("array of {} items", items.len()),
      Self::Object(map) => format!("object with {} keys", map.len()),
    }
  }
}

impl From<serde_json::Value> for FieldValue {
  fn from(value: serde_json::Value) -> Self {
    use serde_json::Value;

    match value {
      Value::Null => Self::Null,
      Value::Bool(b) => Self::Bool(b),
      Value::Number(n) => match n.as_i64() {
        Some(i) => Self::Integer(i),
        // u64 beyond i64::MAX and real numbers both land here.
        None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
      },
      Value::String(s) => Self::Text(s),
      Value::Array(items) => {
        Self::Array(items.into_iter().map(Self::from).collect())
      }
      Value::Object(map) => Self::Object(
        map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
      ),
    }
  }
}

impl From<i64> for FieldValue {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<f64> for FieldValue {
  fn from(f: f64) -> Self { Self::Float(f) }
}

impl From<bool> for FieldValue {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<NaiveDate> for FieldValue {
  fn from(d: NaiveDate) -> Self { Self::Date(d) }
}

impl From<NaiveDateTime> for FieldValue {
  fn from(dt: NaiveDateTime) -> Self { Self::DateTime(dt) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
  fn from(opt: Option<T>) -> Self { opt.map_or(Self::Null, Into::into) }
}

// ─── FieldType ───────────────────────────────────────────────────────────────

/// The semantic type a field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  Integer,
  Text,
  Date,
  /// Only used for the document root of JSON input.
  Object,
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Integer => "integer",
      Self::Text => "text",
      Self::Date => "date",
      Self::Object => "object",
    })
  }
}

// ─── Coercion ────────────────────────────────────────────────────────────────

/// A Rust type a [`FieldValue`] can be coerced into.
///
/// `coerce` never sees [`FieldValue::Null`]; the validator resolves nulls
/// against the field's presence before calling it. Returning `None` means
/// the value is not acceptable for this type.
pub trait Coerce: Sized {
  const TYPE: FieldType;

  fn coerce(value: &FieldValue, settings: &ValidationSettings) -> Option<Self>;
}

impl Coerce for i64 {
  const TYPE: FieldType = FieldType::Integer;

  fn coerce(value: &FieldValue, settings: &ValidationSettings) -> Option<Self> {
    match value {
      FieldValue::Integer(i) => Some(*i),
      _ if settings.strict => None,
      FieldValue::Bool(b) => Some(i64::from(*b)),
      FieldValue::Float(f) => integral_float(*f),
      FieldValue::Text(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

impl Coerce for String {
  const TYPE: FieldType = FieldType::Text;

  fn coerce(value: &FieldValue, settings: &ValidationSettings) -> Option<Self> {
    let text = match value {
      FieldValue::Text(s) => s.clone(),
      _ if settings.strict => return None,
      FieldValue::Integer(i) => i.to_string(),
      FieldValue::Float(f) if f.is_finite() => float_text(*f),
      FieldValue::Bytes(b) => String::from_utf8(b.clone()).ok()?,
      _ => return None,
    };

    if settings.strip_whitespace {
      Some(text.trim().to_owned())
    } else {
      Some(text)
    }
  }
}

impl Coerce for NaiveDate {
  const TYPE: FieldType = FieldType::Date;

  fn coerce(value: &FieldValue, settings: &ValidationSettings) -> Option<Self> {
    match value {
      FieldValue::Date(d) => Some(*d),
      _ if settings.strict => None,
      FieldValue::DateTime(dt) => Some(dt.date()),
      FieldValue::Integer(i) => date_from_unix(*i as f64),
      FieldValue::Float(f) => date_from_unix(*f),
      FieldValue::Text(s) => parse_date_text(s.trim()),
      _ => None,
    }
  }
}

/// Whole floats keep a trailing `.0` so `7.0` stays distinguishable from `7`.
fn float_text(f: f64) -> String {
  if f.fract() == 0.0 {
    format!("{f:.1}")
  } else {
    f.to_string()
  }
}

fn integral_float(f: f64) -> Option<i64> {
  // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
  let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
  if f.is_finite() && f.fract() == 0.0 && in_range {
    Some(f as i64)
  } else {
    None
  }
}

fn date_from_unix(mut seconds: f64) -> Option<NaiveDate> {
  if !seconds.is_finite() {
    return None;
  }
  while seconds.abs() > MS_WATERSHED {
    seconds /= 1000.0;
  }
  DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0)
    .map(|dt| dt.date_naive())
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
  if let Ok(seconds) = s.parse::<f64>() {
    return date_from_unix(seconds);
  }

  let mut parts = s.splitn(3, '-');
  let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
  let digits = |p: &str, min: usize, max: usize| {
    (min..=max).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit())
  };
  if !(digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)) {
    return None;
  }
  NaiveDate::from_ymd_opt(
    year.parse().ok()?,
    month.parse().ok()?,
    day.parse().ok()?,
  )
}

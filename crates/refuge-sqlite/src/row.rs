//! [`RowSource`] and helpers for turning SQLite values into [`FieldValue`]s.
//!
//! SQLite has no date type; dates are expected as `YYYY-MM-DD` text or Unix
//! timestamps and are coerced by the model.

use refuge_schemas::{FieldMap, FieldSource, FieldValue};
use rusqlite::{Row, types::ValueRef};

/// Exposes the columns of one result row by name.
pub struct RowSource<'a, 'stmt> {
  row: &'a Row<'stmt>,
}

impl<'a, 'stmt> RowSource<'a, 'stmt> {
  pub fn new(row: &'a Row<'stmt>) -> Self { Self { row } }
}

impl FieldSource for RowSource<'_, '_> {
  /// A column the statement does not return is absent, not null.
  fn field(&self, name: &str) -> Option<FieldValue> {
    self.row.get_ref(name).ok().map(field_value)
  }
}

/// Map a borrowed SQLite value onto the owned [`FieldValue`] it corresponds
/// to. Text that is not valid UTF-8 is passed on as bytes.
pub fn field_value(value: ValueRef<'_>) -> FieldValue {
  match value {
    ValueRef::Null => FieldValue::Null,
    ValueRef::Integer(i) => FieldValue::Integer(i),
    ValueRef::Real(f) => FieldValue::Float(f),
    ValueRef::Text(t) => match std::str::from_utf8(t) {
      Ok(s) => FieldValue::Text(s.to_owned()),
      Err(_) => FieldValue::Bytes(t.to_vec()),
    },
    ValueRef::Blob(b) => FieldValue::Bytes(b.to_vec()),
  }
}

/// Copy every column of `row` into an owned map. `columns` must be the
/// statement's column names in order.
pub fn snapshot(
  row: &Row<'_>,
  columns: &[String],
) -> rusqlite::Result<FieldMap> {
  columns
    .iter()
    .enumerate()
    .map(|(i, name)| -> rusqlite::Result<_> {
      Ok((name.clone(), field_value(row.get_ref(i)?)))
    })
    .collect()
}

//! [`FieldSource`] — the capability every validator input must provide.
//!
//! Plain mappings implement it by key lookup. Persistence-layer records (see
//! `refuge-sqlite`) and the models themselves implement it by reading
//! same-named members, which is what lets a model be built straight from an
//! object-relational mapping result.

use std::{
  collections::{BTreeMap, HashMap},
  hash::BuildHasher,
};

use crate::value::FieldValue;

/// Anything that can hand out a value for a field name.
pub trait FieldSource {
  /// The value stored under `name`, or `None` when the source has no such
  /// field. A present-but-null field is `Some(FieldValue::Null)`.
  fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
  fn field(&self, name: &str) -> Option<FieldValue> { (**self).field(name) }
}

impl FieldSource for BTreeMap<String, FieldValue> {
  fn field(&self, name: &str) -> Option<FieldValue> { self.get(name).cloned() }
}

impl<H: BuildHasher> FieldSource for HashMap<String, FieldValue, H> {
  fn field(&self, name: &str) -> Option<FieldValue> { self.get(name).cloned() }
}

impl<H: BuildHasher> FieldSource for HashMap<&str, FieldValue, H> {
  fn field(&self, name: &str) -> Option<FieldValue> { self.get(name).cloned() }
}

impl FieldSource for serde_json::Map<String, serde_json::Value> {
  fn field(&self, name: &str) -> Option<FieldValue> {
    self.get(name).cloned().map(FieldValue::from)
  }
}

/// Key/value pairs in declaration order; the last occurrence of a key wins.
impl<K: AsRef<str>> FieldSource for [(K, FieldValue)] {
  fn field(&self, name: &str) -> Option<FieldValue> {
    self
      .iter()
      .rev()
      .find(|(k, _)| k.as_ref() == name)
      .map(|(_, v)| v.clone())
  }
}

impl<K: AsRef<str>, const N: usize> FieldSource for [(K, FieldValue); N] {
  fn field(&self, name: &str) -> Option<FieldValue> {
    self.as_slice().field(name)
  }
}

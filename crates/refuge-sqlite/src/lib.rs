//! SQLite bridge for Refuge record schemas.
//!
//! Result rows are read through [`RowSource`], which exposes columns by name
//! so any [`refuge_schemas::OrmMode`] model can be built from them. Table
//! layout is left entirely to the caller.

mod query;
mod row;

pub mod error;

pub use error::{Error, Result};
pub use query::{RecordReader, query_models};
pub use row::{RowSource, field_value, snapshot};

#[cfg(test)]
mod tests;

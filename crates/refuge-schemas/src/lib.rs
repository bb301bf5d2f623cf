//! Record schemas for Refuge.
//!
//! Three validated value types ([`Refugee`], [`EquivalentKeyword`],
//! [`Keyword`]) that can be built from a plain mapping or from any object
//! exposing the same field names through [`FieldSource`]. Validation reports
//! every failing field at once.
//!
//! This crate is free of database and HTTP dependencies; persistence
//! adapters implement [`FieldSource`] for their own row types.

pub mod error;
pub mod keyword;
pub mod model;
pub mod refugee;
pub mod settings;
pub mod source;
pub mod value;

pub use error::{Error, FieldError, FieldErrorKind, Result, ValidationError};
pub use keyword::{EquivalentKeyword, Keyword};
pub use model::{FieldSpec, Model, OrmMode, Presence};
pub use refugee::Refugee;
pub use settings::ValidationSettings;
pub use source::FieldSource;
pub use value::{FieldMap, FieldType, FieldValue};

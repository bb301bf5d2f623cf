//! Validation settings, loadable from TOML and the environment.
//!
//! ```toml
//! strict           = false
//! strip_whitespace = true
//! ```
//!
//! Environment variables prefixed `REFUGE_` override the file, e.g.
//! `REFUGE_STRICT=true`.

use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Knobs that change how input values are coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
  /// Accept only the native value variant for each field type.
  pub strict:           bool,
  /// Trim leading and trailing whitespace from text fields.
  pub strip_whitespace: bool,
}

impl ValidationSettings {
  /// Strict settings with no other changes.
  pub fn strict() -> Self { Self { strict: true, ..Self::default() } }

  /// Load from an optional TOML file, then `REFUGE_*` environment variables.
  /// A missing file is not an error.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings: Self = builder
      .add_source(config::Environment::with_prefix("REFUGE"))
      .build()?
      .try_deserialize()?;
    tracing::debug!(?settings, "loaded validation settings");
    Ok(settings)
  }

  /// Build from inline TOML, ignoring the environment.
  pub fn from_toml_str(toml: &str) -> Result<Self> {
    Ok(
      config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize()?,
    )
  }
}

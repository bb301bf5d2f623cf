//! Running queries and shaping their rows into models.

use std::path::Path;

use refuge_schemas::{FieldMap, OrmMode, ValidationSettings};
use rusqlite::{Connection, Params, types::Value};

use crate::{
  Error, Result,
  row::{RowSource, snapshot},
};

// ─── Blocking ────────────────────────────────────────────────────────────────

/// Run `sql` on a blocking connection and build one `M` per row.
///
/// Stops at the first row that fails validation.
pub fn query_models<M, P>(
  conn: &Connection,
  sql: &str,
  params: P,
  settings: &ValidationSettings,
) -> Result<Vec<M>>
where
  M: OrmMode,
  P: Params,
{
  let mut stmt = conn.prepare(sql)?;
  let mut rows = stmt.query(params)?;

  let mut models = Vec::new();
  while let Some(row) = rows.next()? {
    let model = M::from_object_with(&RowSource::new(row), settings)
      .map_err(|source| Error::Validation { row: models.len(), source })?;
    models.push(model);
  }

  tracing::debug!(model = M::NAME, rows = models.len(), "query complete");
  Ok(models)
}

// ─── Async ───────────────────────────────────────────────────────────────────

/// Reads models from a SQLite file via [`tokio_rusqlite`], so queries run on
/// a dedicated thread without blocking the async runtime.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct RecordReader {
  conn:     tokio_rusqlite::Connection,
  settings: ValidationSettings,
}

impl RecordReader {
  /// Open (or create) the database at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self::from_connection(conn))
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self::from_connection(conn))
  }

  pub fn from_connection(conn: tokio_rusqlite::Connection) -> Self {
    Self { conn, settings: ValidationSettings::default() }
  }

  /// Validate rows with `settings` instead of the defaults.
  pub fn with_settings(mut self, settings: ValidationSettings) -> Self {
    self.settings = settings;
    self
  }

  /// The underlying connection, for statements that are not model reads.
  pub fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  /// Run `sql` and build one `M` per row.
  ///
  /// Rows are copied out on the database thread and validated here; the
  /// first row that fails validation aborts the whole read.
  pub async fn fetch<M: OrmMode>(
    &self,
    sql: impl Into<String>,
    params: Vec<Value>,
  ) -> Result<Vec<M>> {
    let sql = sql.into();

    let rows: Vec<FieldMap> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            snapshot(row, &columns)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(model = M::NAME, rows = rows.len(), "fetched rows");

    rows
      .iter()
      .enumerate()
      .map(|(row, fields)| {
        M::from_object_with(fields, &self.settings)
          .map_err(|source| Error::Validation { row, source })
      })
      .collect()
  }

  /// Like [`RecordReader::fetch`] but reads only the first row; later rows
  /// are neither copied nor validated.
  pub async fn fetch_optional<M: OrmMode>(
    &self,
    sql: impl Into<String>,
    params: Vec<Value>,
  ) -> Result<Option<M>> {
    let sql = sql.into();

    let first: Option<FieldMap> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
        let first = match rows.next()? {
          Some(row) => Some(snapshot(row, &columns)?),
          None => None,
        };
        Ok(first)
      })
      .await?;

    tracing::debug!(model = M::NAME, found = first.is_some(), "fetched row");

    first
      .map(|fields| {
        M::from_object_with(&fields, &self.settings)
          .map_err(|source| Error::Validation { row: 0, source })
      })
      .transpose()
  }
}

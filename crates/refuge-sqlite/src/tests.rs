//! Tests for the row bridge against in-memory databases.

use chrono::NaiveDate;
use refuge_schemas::{
  EquivalentKeyword, FieldSource, FieldValue, Keyword, Refugee,
  ValidationSettings,
};
use rusqlite::{Connection, types::Value};

use crate::{Error, RecordReader, RowSource, query_models};

const FIXTURE: &str = "
CREATE TABLE refugees (
    id              INTEGER PRIMARY KEY,
    first_name      TEXT NOT NULL,
    family_name     TEXT NOT NULL,
    birth_date      TEXT,
    salary_targeted INTEGER,
    email           TEXT NOT NULL,
    keywords        TEXT NOT NULL,
    created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE equivalent_keywords (
    label   TEXT NOT NULL,
    keyword TEXT NOT NULL
);

CREATE TABLE keywords (
    label    TEXT PRIMARY KEY,
    category TEXT
);

INSERT INTO refugees (id, first_name, family_name, birth_date, salary_targeted, email, keywords)
VALUES
    (1, 'Amina', 'Yusuf',  '1990-04-12', 42000, 'a@example.org', 'python,ops'),
    (2, 'Omar',  'Haddad', NULL,         NULL,  'o@example.org', 'logistics');

INSERT INTO equivalent_keywords (label, keyword)
VALUES ('remote-ok', 'remote'), ('py', 'python');

INSERT INTO keywords (label, category)
VALUES ('python', 'language'), ('remote', NULL);
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn blocking() -> Connection {
  let conn = Connection::open_in_memory().expect("in-memory connection");
  conn.execute_batch(FIXTURE).expect("fixture");
  conn
}

async fn reader() -> RecordReader {
  let reader = RecordReader::open_in_memory()
    .await
    .expect("in-memory reader");
  reader
    .connection()
    .call(|conn| {
      conn.execute_batch(FIXTURE)?;
      Ok(())
    })
    .await
    .expect("fixture");
  reader
}

// ─── RowSource ───────────────────────────────────────────────────────────────

#[test]
fn row_source_maps_sqlite_types() {
  let conn = blocking();
  let fields = conn
    .query_row(
      "SELECT 1 AS i, 2.5 AS r, 'x' AS t, x'0102' AS b, NULL AS n",
      [],
      |row| {
        let src = RowSource::new(row);
        Ok(["i", "r", "t", "b", "n", "missing"].map(|c| src.field(c)))
      },
    )
    .unwrap();

  assert_eq!(
    fields,
    [
      Some(FieldValue::Integer(1)),
      Some(FieldValue::Float(2.5)),
      Some(FieldValue::Text("x".into())),
      Some(FieldValue::Bytes(vec![1, 2])),
      Some(FieldValue::Null),
      None,
    ]
  );
}

// ─── Blocking queries ────────────────────────────────────────────────────────

#[test]
fn query_refugees() {
  let conn = blocking();
  let refugees: Vec<Refugee> = query_models(
    &conn,
    "SELECT * FROM refugees ORDER BY id",
    [],
    &ValidationSettings::default(),
  )
  .unwrap();

  assert_eq!(refugees.len(), 2);
  assert_eq!(refugees[0].first_name(), "Amina");
  assert_eq!(refugees[0].birth_date(), Some(date(1990, 4, 12)));
  assert_eq!(refugees[0].salary_targeted(), Some(42000));
  assert_eq!(refugees[1].birth_date(), None);
  assert_eq!(refugees[1].salary_targeted(), None);
}

#[test]
fn query_with_params() {
  let conn = blocking();
  let found: Vec<EquivalentKeyword> = query_models(
    &conn,
    "SELECT label, keyword FROM equivalent_keywords WHERE keyword = ?1",
    ["remote"],
    &ValidationSettings::default(),
  )
  .unwrap();

  assert_eq!(found.len(), 1);
  assert_eq!(found[0].label(), "remote-ok");
}

#[test]
fn unselected_column_is_missing() {
  let conn = blocking();
  let result: Result<Vec<Refugee>, _> = query_models(
    &conn,
    "SELECT id, first_name, family_name, keywords FROM refugees",
    [],
    &ValidationSettings::default(),
  );

  match result {
    Err(Error::Validation { row, source }) => {
      assert_eq!(row, 0);
      assert_eq!(source.fields().collect::<Vec<_>>(), ["email"]);
      assert!(source.errors[0].is_missing());
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn bad_row_is_identified_by_index() {
  let conn = blocking();
  conn
    .execute(
      "INSERT INTO refugees (id, first_name, family_name, salary_targeted, email, keywords)
       VALUES (3, 'Lina', 'Saleh', 'lots', 'l@example.org', 'care')",
      [],
    )
    .unwrap();

  let result: Result<Vec<Refugee>, _> = query_models(
    &conn,
    "SELECT * FROM refugees ORDER BY id",
    [],
    &ValidationSettings::default(),
  );

  match result {
    Err(Error::Validation { row, source }) => {
      assert_eq!(row, 2);
      assert_eq!(source.fields().collect::<Vec<_>>(), ["salary_targeted"]);
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn sql_errors_surface_as_database_errors() {
  let conn = blocking();
  let result: Result<Vec<Keyword>, _> = query_models(
    &conn,
    "SELECT label FROM no_such_table",
    [],
    &ValidationSettings::default(),
  );
  assert!(matches!(result, Err(Error::Database(_))));
}

// ─── Async reader ────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_keywords_ignores_category() {
  let r = reader().await;
  let keywords: Vec<Keyword> = r
    .fetch("SELECT * FROM keywords ORDER BY label", vec![])
    .await
    .unwrap();

  let labels: Vec<_> = keywords.iter().map(Keyword::label).collect();
  assert_eq!(labels, ["python", "remote"]);
}

#[tokio::test]
async fn fetch_with_params() {
  let r = reader().await;
  let refugee: Option<Refugee> = r
    .fetch_optional(
      "SELECT * FROM refugees WHERE id = ?1",
      vec![Value::Integer(2)],
    )
    .await
    .unwrap();

  let refugee = refugee.expect("refugee 2");
  assert_eq!(refugee.family_name(), "Haddad");
  assert_eq!(refugee.keywords(), "logistics");
}

#[tokio::test]
async fn fetch_optional_empty() {
  let r = reader().await;
  let none: Option<Keyword> = r
    .fetch_optional(
      "SELECT * FROM keywords WHERE label = ?1",
      vec![Value::Text("rust".into())],
    )
    .await
    .unwrap();
  assert!(none.is_none());
}

#[tokio::test]
async fn fetch_optional_ignores_later_bad_rows() {
  let r = reader().await;
  r.connection()
    .call(|conn| {
      conn.execute(
        "INSERT INTO refugees (id, first_name, family_name, salary_targeted, email, keywords)
         VALUES (3, 'Lina', 'Saleh', 'lots', 'l@example.org', 'care')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let first: Option<Refugee> = r
    .fetch_optional("SELECT * FROM refugees ORDER BY id", vec![])
    .await
    .unwrap();
  assert_eq!(first.expect("first refugee").first_name(), "Amina");

  let all: Result<Vec<Refugee>, _> =
    r.fetch("SELECT * FROM refugees ORDER BY id", vec![]).await;
  assert!(matches!(all, Err(Error::Validation { row: 2, .. })));
}

#[tokio::test]
async fn fetch_optional_reports_bad_first_row() {
  let r = reader().await;
  let result: Result<Option<Refugee>, _> = r
    .fetch_optional("SELECT id, first_name FROM refugees ORDER BY id", vec![])
    .await;

  match result {
    Err(Error::Validation { row, source }) => {
      assert_eq!(row, 0);
      assert_eq!(
        source.fields().collect::<Vec<_>>(),
        ["family_name", "email", "keywords"]
      );
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn strict_reader_rejects_text_dates() {
  let r = reader().await.with_settings(ValidationSettings::strict());
  let result: Result<Vec<Refugee>, _> = r
    .fetch("SELECT * FROM refugees ORDER BY id", vec![])
    .await;

  match result {
    Err(Error::Validation { row, source }) => {
      assert_eq!(row, 0);
      assert_eq!(source.fields().collect::<Vec<_>>(), ["birth_date"]);
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn fetched_models_match_blocking_query() {
  let r = reader().await;
  let fetched: Vec<Refugee> = r
    .fetch("SELECT * FROM refugees ORDER BY id", vec![])
    .await
    .unwrap();

  let queried: Vec<Refugee> = query_models(
    &blocking(),
    "SELECT * FROM refugees ORDER BY id",
    [],
    &ValidationSettings::default(),
  )
  .unwrap();

  assert_eq!(fetched, queried);
}

//! Shared statement helpers for the SQLite repositories.

use crate::db::migrations::{latest_version, schema_version};
use crate::repo::{RepoError, RepoResult};
use chrono::Utc;
use rusqlite::{Connection, Params, Row};
use uuid::Uuid;

/// Runs `sql` and decodes the first row, if any.
///
/// Also used for `INSERT/UPDATE ... RETURNING`, whose writes happen on the
/// first step.
pub(crate) fn query_optional<T, P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: F,
) -> RepoResult<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> RepoResult<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn parse_uuid(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

/// Wall-clock epoch milliseconds used for `created_at`/`updated_at`.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

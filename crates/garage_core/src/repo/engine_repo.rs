//! Engine repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `engines` table alone.
//! - Expose row-level statements the car repository runs inside its own
//!   transactions.
//!
//! # Invariants
//! - Create/update validate the request before any SQL runs.
//! - Update replaces all three attributes; there is no partial update.
//! - An engine still referenced by a car cannot be deleted (foreign key).

use crate::db::{begin_write, commit, CancelToken};
use crate::model::engine::{Engine, EngineId, EngineRequest};
use crate::repo::sql::{ensure_schema_ready, parse_uuid, query_optional};
use crate::repo::{MissingRecord, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ENGINE_COLUMNS: &str = "id, displacement, number_of_cylinders, car_range";

/// Repository interface for standalone engine operations.
pub trait EngineRepository {
    /// Loads one engine by id.
    fn get_engine(&self, id: EngineId) -> RepoResult<Engine>;
    /// Validates and inserts one engine with a fresh id.
    fn create_engine(&self, request: &EngineRequest) -> RepoResult<Engine>;
    /// Validates and replaces all attributes of one engine.
    fn update_engine(&self, id: EngineId, request: &EngineRequest) -> RepoResult<Engine>;
    /// Deletes one engine in its own transaction.
    fn delete_engine(&self, id: EngineId) -> RepoResult<()>;
}

/// SQLite-backed engine repository.
pub struct SqliteEngineRepository<'conn> {
    conn: &'conn Connection,
    cancel: CancelToken,
}

impl<'conn> SqliteEngineRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self {
            conn,
            cancel: CancelToken::new(),
        })
    }

    /// Aborts write transactions once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }
}

impl EngineRepository for SqliteEngineRepository<'_> {
    fn get_engine(&self, id: EngineId) -> RepoResult<Engine> {
        self.cancel.check()?;
        load_engine(self.conn, id)
    }

    fn create_engine(&self, request: &EngineRequest) -> RepoResult<Engine> {
        request.validate()?;
        self.cancel.check()?;
        insert_engine(self.conn, request)
    }

    fn update_engine(&self, id: EngineId, request: &EngineRequest) -> RepoResult<Engine> {
        request.validate()?;
        self.cancel.check()?;
        replace_engine(self.conn, id, request)
    }

    fn delete_engine(&self, id: EngineId) -> RepoResult<()> {
        let tx = begin_write(self.conn, &self.cancel)?;
        delete_engine_row(&tx, id)?;
        commit(tx, &self.cancel)?;
        Ok(())
    }
}

/// Inserts one engine row and returns it with its generated id.
pub(crate) fn insert_engine(conn: &Connection, request: &EngineRequest) -> RepoResult<Engine> {
    let id = Uuid::new_v4();
    query_optional(
        conn,
        &format!(
            "INSERT INTO engines ({ENGINE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {ENGINE_COLUMNS};"
        ),
        params![
            id.to_string(),
            request.displacement,
            request.number_of_cylinders,
            request.car_range,
        ],
        parse_engine_row,
    )?
    .ok_or_else(|| RepoError::InvalidData("engine insert returned no row".to_string()))
}

/// Replaces the three attributes of one engine row.
pub(crate) fn replace_engine(
    conn: &Connection,
    id: EngineId,
    request: &EngineRequest,
) -> RepoResult<Engine> {
    query_optional(
        conn,
        &format!(
            "UPDATE engines
             SET
                displacement = ?2,
                number_of_cylinders = ?3,
                car_range = ?4
             WHERE id = ?1
             RETURNING {ENGINE_COLUMNS};"
        ),
        params![
            id.to_string(),
            request.displacement,
            request.number_of_cylinders,
            request.car_range,
        ],
        parse_engine_row,
    )?
    .ok_or(RepoError::NotFound(MissingRecord::Engine(id)))
}

pub(crate) fn load_engine(conn: &Connection, id: EngineId) -> RepoResult<Engine> {
    query_optional(
        conn,
        &format!("SELECT {ENGINE_COLUMNS} FROM engines WHERE id = ?1;"),
        [id.to_string()],
        parse_engine_row,
    )?
    .ok_or(RepoError::NotFound(MissingRecord::Engine(id)))
}

pub(crate) fn delete_engine_row(conn: &Connection, id: EngineId) -> RepoResult<()> {
    let changed = conn.execute("DELETE FROM engines WHERE id = ?1;", [id.to_string()])?;
    if changed == 0 {
        return Err(RepoError::NotFound(MissingRecord::Engine(id)));
    }
    Ok(())
}

fn parse_engine_row(row: &Row<'_>) -> RepoResult<Engine> {
    Ok(Engine {
        engine_id: parse_uuid(row, "id")?,
        displacement: row.get("displacement")?,
        number_of_cylinders: row.get("number_of_cylinders")?,
        car_range: row.get("car_range")?,
    })
}

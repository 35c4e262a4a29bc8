//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the engine and car data-access contracts.
//! - Keep SQL and transaction handling inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate their request before any SQL runs.
//! - Multi-statement writes run in one scoped transaction.
//! - "No row" outcomes surface as `RepoError::NotFound`, never as a DB error.

pub mod car_repo;
pub mod engine_repo;
mod error;
mod sql;

pub use error::{ErrorKind, MissingRecord, RepoError, RepoResult};

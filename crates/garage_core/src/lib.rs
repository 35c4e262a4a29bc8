//! Core data-access layer for cars and the engines they own.
//! This crate is the single source of truth for the car/engine invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::CancelToken;
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LogLevel};
pub use model::car::{Car, CarEngineRequest, CarId, CarRequest, FuelType};
pub use model::engine::{Engine, EngineId, EngineRequest};
pub use model::validation::ValidationError;
pub use repo::car_repo::{CarRepository, SqliteCarRepository};
pub use repo::engine_repo::{EngineRepository, SqliteEngineRepository};
pub use repo::{ErrorKind, MissingRecord, RepoError, RepoResult};
pub use service::car_service::CarService;
pub use service::engine_service::EngineService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Engine use-case service.

use crate::model::engine::{Engine, EngineId, EngineRequest};
use crate::repo::engine_repo::EngineRepository;
use crate::repo::RepoResult;
use crate::service::log_outcome;
use std::time::Instant;

/// Use-case facade for standalone engine operations.
pub struct EngineService<R: EngineRepository> {
    repo: R,
}

impl<R: EngineRepository> EngineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_engine(&self, id: EngineId) -> RepoResult<Engine> {
        let started_at = Instant::now();
        let result = self.repo.get_engine(id);
        log_outcome("engine_get", started_at, &format!("engine_id={id}"), result)
    }

    pub fn create_engine(&self, request: &EngineRequest) -> RepoResult<Engine> {
        let started_at = Instant::now();
        let result = self.repo.create_engine(request);
        let target = match &result {
            Ok(engine) => format!("engine_id={}", engine.engine_id),
            Err(_) => "engine_id=none".to_string(),
        };
        log_outcome("engine_create", started_at, &target, result)
    }

    pub fn update_engine(&self, id: EngineId, request: &EngineRequest) -> RepoResult<Engine> {
        let started_at = Instant::now();
        let result = self.repo.update_engine(id, request);
        log_outcome("engine_update", started_at, &format!("engine_id={id}"), result)
    }

    /// Resolves the engine first so a missing id is reported before any
    /// write transaction opens.
    pub fn delete_engine(&self, id: EngineId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo
            .get_engine(id)
            .and_then(|engine| self.repo.delete_engine(engine.engine_id));
        log_outcome("engine_delete", started_at, &format!("engine_id={id}"), result)
    }
}

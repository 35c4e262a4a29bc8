//! Car use-case service.
//!
//! # Responsibility
//! - Provide car CRUD entry points for outer layers.
//! - Log each call with ids and timing only.
//!
//! # Invariants
//! - Every call maps to exactly one repository call; transactions and
//!   validation stay in the repository.

use crate::model::car::{Car, CarId, CarRequest};
use crate::repo::car_repo::CarRepository;
use crate::repo::RepoResult;
use crate::service::log_outcome;
use std::time::Instant;

/// Use-case facade over a `CarRepository`.
pub struct CarService<R: CarRepository> {
    repo: R,
}

impl<R: CarRepository> CarService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_car(&self, id: CarId) -> RepoResult<Car> {
        let started_at = Instant::now();
        let result = self.repo.get_car(id);
        log_outcome("car_get", started_at, &format!("car_id={id}"), result)
    }

    /// Lists cars of one brand. An empty list is a normal result.
    pub fn get_cars_by_brand(&self, brand: &str, include_engine: bool) -> RepoResult<Vec<Car>> {
        let started_at = Instant::now();
        let result = self.repo.get_cars_by_brand(brand, include_engine);
        let target = match &result {
            Ok(cars) => format!("include_engine={include_engine} count={}", cars.len()),
            Err(_) => format!("include_engine={include_engine}"),
        };
        log_outcome("car_list_by_brand", started_at, &target, result)
    }

    pub fn create_car(&self, request: &CarRequest) -> RepoResult<Car> {
        let started_at = Instant::now();
        let result = self.repo.create_car(request);
        let target = match &result {
            Ok(car) => format!("car_id={} engine_id={}", car.id, car.engine.engine_id),
            Err(_) => "car_id=none".to_string(),
        };
        log_outcome("car_create", started_at, &target, result)
    }

    pub fn update_car(&self, id: CarId, request: &CarRequest) -> RepoResult<Car> {
        let started_at = Instant::now();
        let result = self.repo.update_car(id, request);
        let target = format!(
            "car_id={id} engine_update={}",
            request.engine.engine_id.is_some()
        );
        log_outcome("car_update", started_at, &target, result)
    }

    pub fn delete_car(&self, id: CarId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_car(id);
        log_outcome("car_delete", started_at, &format!("car_id={id}"), result)
    }
}

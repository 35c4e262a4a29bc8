//! Engine domain model.
//!
//! # Responsibility
//! - Define the engine row shape and the full-replace request input.
//!
//! # Invariants
//! - `engine_id` is generated by storage code, never by callers.
//! - All three numeric attributes are replaced together on update.

use crate::model::validation::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one engine row.
pub type EngineId = Uuid;

/// Persisted engine row.
///
/// Also used as the nested engine of a `Car`. For brand listings without the
/// engine join only `engine_id` is populated and the numeric fields stay `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Engine {
    pub engine_id: EngineId,
    /// Cubic centimetres.
    pub displacement: i64,
    pub number_of_cylinders: i64,
    /// Kilometres per full tank or charge.
    pub car_range: i64,
}

/// Input for standalone engine create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineRequest {
    pub displacement: i64,
    pub number_of_cylinders: i64,
    pub car_range: i64,
}

impl EngineRequest {
    /// Checks that every attribute is strictly positive.
    pub fn validate(&self) -> ValidationResult {
        if self.displacement <= 0 {
            return Err(ValidationError::DisplacementNotPositive);
        }
        if self.number_of_cylinders <= 0 {
            return Err(ValidationError::CylindersNotPositive);
        }
        if self.car_range <= 0 {
            return Err(ValidationError::CarRangeNotPositive);
        }
        Ok(())
    }
}

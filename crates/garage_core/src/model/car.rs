//! Car domain model.
//!
//! # Responsibility
//! - Define the car row shape with its nested engine.
//! - Define the create/update request input and its validation entry points.
//!
//! # Invariants
//! - `Car::engine.engine_id` always names an existing engine row.
//! - `updated_at >= created_at`, both epoch milliseconds assigned by storage.
//! - `fuel_type` is persisted as its lowercase name.

use crate::model::engine::{Engine, EngineId, EngineRequest};
use crate::model::validation::{
    current_year, validate_fuel_type, validate_price, validate_required, validate_year,
    ValidationError, ValidationResult, MIN_CAR_DISPLACEMENT,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one car row.
pub type CarId = Uuid;

/// Accepted fuel types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    /// Lowercase name, as stored in `cars.fuel_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
        }
    }

    /// Exact-match parse; no case folding.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "petrol" => Some(Self::Petrol),
            "diesel" => Some(Self::Diesel),
            "electric" => Some(Self::Electric),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Persisted car row with its nested engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    /// Four-digit model year, kept as text to match the request shape.
    pub year: String,
    pub brand: String,
    pub fuel_type: FuelType,
    pub engine: Engine,
    pub price: f64,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds. Strictly increases on every update.
    pub updated_at: i64,
}

/// Engine part of a car request.
///
/// `engine_id` is ignored on create. On update, `None` leaves the owned
/// engine untouched and `Some` replaces its three attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarEngineRequest {
    #[serde(default)]
    pub engine_id: Option<EngineId>,
    #[serde(default)]
    pub displacement: i64,
    #[serde(default)]
    pub number_of_cylinders: i64,
    #[serde(default)]
    pub car_range: i64,
}

impl CarEngineRequest {
    /// Drops the identity, leaving the attribute payload.
    pub fn attributes(&self) -> EngineRequest {
        EngineRequest {
            displacement: self.displacement,
            number_of_cylinders: self.number_of_cylinders,
            car_range: self.car_range,
        }
    }

    fn validate(&self) -> ValidationResult {
        if self.displacement <= 0 {
            return Err(ValidationError::DisplacementNotPositive);
        }
        if self.number_of_cylinders <= 0 {
            return Err(ValidationError::CylindersNotPositive);
        }
        if self.displacement < MIN_CAR_DISPLACEMENT {
            return Err(ValidationError::DisplacementBelowMinimum(self.displacement));
        }
        if self.car_range <= 0 {
            return Err(ValidationError::CarRangeNotPositive);
        }
        Ok(())
    }
}

/// Input for car create/update. Update uses full-replace semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRequest {
    pub name: String,
    pub year: String,
    pub brand: String,
    /// Raw value; checked against `FuelType` during validation.
    pub fuel_type: String,
    #[serde(default)]
    pub engine: CarEngineRequest,
    pub price: f64,
}

impl CarRequest {
    /// Validates a create request against the current calendar year.
    pub fn validate_for_create(&self) -> Result<FuelType, ValidationError> {
        self.validate_for_create_at(current_year())
    }

    /// Validates an update request against the current calendar year.
    pub fn validate_for_update(&self) -> Result<FuelType, ValidationError> {
        self.validate_for_update_at(current_year())
    }

    /// Create validation with an explicit upper year bound.
    ///
    /// Returns the parsed fuel type so callers do not parse twice.
    pub fn validate_for_create_at(&self, max_year: i32) -> Result<FuelType, ValidationError> {
        self.validate_with(max_year, true)
    }

    /// Update validation with an explicit upper year bound.
    ///
    /// Engine attributes are only checked when `engine.engine_id` is set.
    pub fn validate_for_update_at(&self, max_year: i32) -> Result<FuelType, ValidationError> {
        self.validate_with(max_year, self.engine.engine_id.is_some())
    }

    fn validate_with(&self, max_year: i32, check_engine: bool) -> Result<FuelType, ValidationError> {
        validate_required(&self.name, ValidationError::NameRequired)?;
        validate_year(&self.year, max_year)?;
        validate_required(&self.brand, ValidationError::BrandRequired)?;
        let fuel_type = validate_fuel_type(&self.fuel_type)?;
        if check_engine {
            self.engine.validate()?;
        }
        validate_price(self.price)?;
        Ok(fuel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::{CarEngineRequest, CarRequest, FuelType};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    fn valid_request() -> CarRequest {
        CarRequest {
            name: "Corolla".to_string(),
            year: "2020".to_string(),
            brand: "Toyota".to_string(),
            fuel_type: "petrol".to_string(),
            engine: CarEngineRequest {
                engine_id: None,
                displacement: 1800,
                number_of_cylinders: 4,
                car_range: 600,
            },
            price: 21000.0,
        }
    }

    #[test]
    fn valid_request_passes_and_returns_fuel_type() {
        assert_eq!(
            valid_request().validate_for_create_at(2024),
            Ok(FuelType::Petrol)
        );
    }

    #[test]
    fn zero_cylinders_is_rejected_with_stable_message() {
        let mut request = valid_request();
        request.engine.displacement = 1200;
        request.engine.number_of_cylinders = 0;

        let err = request.validate_for_create_at(2024).unwrap_err();
        assert_eq!(err, ValidationError::CylindersNotPositive);
        assert_eq!(err.to_string(), "number of cylinders must be greater than 0");
    }

    #[test]
    fn car_engine_requires_minimum_displacement() {
        let mut request = valid_request();
        request.engine.displacement = 999;
        assert_eq!(
            request.validate_for_create_at(2024),
            Err(ValidationError::DisplacementBelowMinimum(999))
        );

        request.engine.displacement = 1000;
        assert!(request.validate_for_create_at(2024).is_ok());
    }

    #[test]
    fn update_without_engine_identity_skips_engine_checks() {
        let mut request = valid_request();
        request.engine = CarEngineRequest::default();
        assert!(request.validate_for_update_at(2024).is_ok());
        assert!(request.validate_for_create_at(2024).is_err());

        request.engine.engine_id = Some(Uuid::new_v4());
        assert_eq!(
            request.validate_for_update_at(2024),
            Err(ValidationError::DisplacementNotPositive)
        );
    }

    #[test]
    fn scalar_fields_are_checked_before_engine_and_price() {
        let mut request = valid_request();
        request.name = "   ".to_string();
        request.price = -1.0;
        assert_eq!(
            request.validate_for_create_at(2024),
            Err(ValidationError::NameRequired)
        );

        let mut request = valid_request();
        request.brand.clear();
        assert_eq!(
            request.validate_for_create_at(2024),
            Err(ValidationError::BrandRequired)
        );
    }

    #[test]
    fn request_decodes_from_snake_case_json() {
        let request: CarRequest = serde_json::from_str(
            r#"{
                "name": "Model X",
                "year": "2022",
                "brand": "Tesla",
                "fuel_type": "electric",
                "engine": {"displacement": 1200, "number_of_cylinders": 2, "car_range": 500},
                "price": 79999.0
            }"#,
        )
        .unwrap();
        assert_eq!(request.engine.engine_id, None);
        assert_eq!(request.engine.car_range, 500);
        assert_eq!(request.validate_for_create_at(2024), Ok(FuelType::Electric));
    }
}

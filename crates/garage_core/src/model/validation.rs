//! Field-level validation rules shared by car and engine requests.
//!
//! # Responsibility
//! - Reject malformed or out-of-range input before storage is touched.
//! - Keep user-facing messages stable for the HTTP layer.
//!
//! # Invariants
//! - Validation is pure: it never reads storage or mutates input.
//! - Checks run in a fixed order and the first failure wins.

use crate::model::car::{CarId, FuelType};
use crate::model::engine::EngineId;
use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted model year.
pub const MIN_MODEL_YEAR: i32 = 1900;
/// Lowest accepted displacement for an engine fitted to a car.
pub const MIN_CAR_DISPLACEMENT: i64 = 1000;

static YEAR_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

pub type ValidationResult = Result<(), ValidationError>;

/// Input rejected before any write was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    YearRequired,
    YearNotFourDigits,
    YearNotNumeric,
    YearOutOfRange { year: i32, max_year: i32 },
    BrandRequired,
    UnknownFuelType(String),
    DisplacementNotPositive,
    CylindersNotPositive,
    DisplacementBelowMinimum(i64),
    CarRangeNotPositive,
    PriceNotPositive,
    /// Update named an engine that is not the one the car owns.
    EngineNotOwned { car_id: CarId, engine_id: EngineId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name is required"),
            Self::YearRequired => write!(f, "year is required"),
            Self::YearNotFourDigits => write!(f, "year must be 4 digits"),
            Self::YearNotNumeric => write!(f, "year must be a number"),
            Self::YearOutOfRange { .. } => {
                write!(f, "year must be between {MIN_MODEL_YEAR} and current year")
            }
            Self::BrandRequired => write!(f, "brand is required"),
            Self::UnknownFuelType(_) => write!(
                f,
                "fuel type must be one of the following: {}",
                FuelType::ALL
                    .iter()
                    .map(|fuel| fuel.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::DisplacementNotPositive => write!(f, "displacement must be greater than 0"),
            Self::CylindersNotPositive => {
                write!(f, "number of cylinders must be greater than 0")
            }
            Self::DisplacementBelowMinimum(_) => {
                write!(f, "displacement must be at least {MIN_CAR_DISPLACEMENT}")
            }
            Self::CarRangeNotPositive => write!(f, "car range must be greater than 0"),
            Self::PriceNotPositive => write!(f, "price must be greater than 0"),
            Self::EngineNotOwned { car_id, engine_id } => {
                write!(f, "engine {engine_id} does not belong to car {car_id}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns the current UTC calendar year, the upper bound for `year`.
pub fn current_year() -> i32 {
    Utc::now().year()
}

pub(crate) fn validate_required(value: &str, missing: ValidationError) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(missing);
    }
    Ok(())
}

pub(crate) fn validate_year(year: &str, max_year: i32) -> ValidationResult {
    if year.is_empty() {
        return Err(ValidationError::YearRequired);
    }
    if year.len() != 4 {
        return Err(ValidationError::YearNotFourDigits);
    }
    if !YEAR_DIGITS_RE.is_match(year) {
        return Err(ValidationError::YearNotNumeric);
    }
    let value: i32 = year.parse().map_err(|_| ValidationError::YearNotNumeric)?;
    if !(MIN_MODEL_YEAR..=max_year).contains(&value) {
        return Err(ValidationError::YearOutOfRange {
            year: value,
            max_year,
        });
    }
    Ok(())
}

pub(crate) fn validate_fuel_type(fuel_type: &str) -> Result<FuelType, ValidationError> {
    FuelType::parse(fuel_type).ok_or_else(|| ValidationError::UnknownFuelType(fuel_type.to_string()))
}

pub(crate) fn validate_price(price: f64) -> ValidationResult {
    // NaN compares false against everything, so test the accepted range.
    if price.is_finite() && price > 0.0 {
        return Ok(());
    }
    Err(ValidationError::PriceNotPositive)
}

#[cfg(test)]
mod tests {
    use super::{
        validate_fuel_type, validate_price, validate_required, validate_year, ValidationError,
    };
    use crate::model::car::FuelType;

    #[test]
    fn year_checks_run_in_order() {
        assert_eq!(validate_year("", 2024), Err(ValidationError::YearRequired));
        assert_eq!(validate_year("abc", 2024), Err(ValidationError::YearNotFourDigits));
        assert_eq!(validate_year("20x2", 2024), Err(ValidationError::YearNotNumeric));
        assert_eq!(validate_year("+202", 2024), Err(ValidationError::YearNotNumeric));
        assert_eq!(
            validate_year("1899", 2024),
            Err(ValidationError::YearOutOfRange {
                year: 1899,
                max_year: 2024
            })
        );
        assert!(validate_year("2025", 2024).is_err());
        assert_eq!(validate_year("1900", 2024), Ok(()));
        assert_eq!(validate_year("2024", 2024), Ok(()));
    }

    #[test]
    fn required_fields_reject_whitespace_only_values() {
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(
                validate_required(blank, ValidationError::NameRequired),
                Err(ValidationError::NameRequired)
            );
        }
        assert_eq!(validate_required(" Volvo ", ValidationError::BrandRequired), Ok(()));
    }

    #[test]
    fn displacement_minimum_message_names_inclusive_bound() {
        assert_eq!(
            ValidationError::DisplacementBelowMinimum(999).to_string(),
            "displacement must be at least 1000"
        );
    }

    #[test]
    fn fuel_type_must_be_known_and_lowercase() {
        assert_eq!(validate_fuel_type("hybrid"), Ok(FuelType::Hybrid));
        let err = validate_fuel_type("rocket").unwrap_err();
        assert_eq!(
            err.to_string(),
            "fuel type must be one of the following: petrol, diesel, electric, hybrid"
        );
        assert!(validate_fuel_type("Petrol").is_err());
    }

    #[test]
    fn price_rejects_non_positive_and_non_finite() {
        assert_eq!(validate_price(0.01), Ok(()));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(validate_price(bad), Err(ValidationError::PriceNotPositive));
        }
    }
}

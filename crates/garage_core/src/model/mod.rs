//! Domain model for the car/engine store.
//!
//! # Responsibility
//! - Define the persisted shapes (`Car`, `Engine`) and their request inputs.
//! - Own field-level validation that runs before any storage access.
//!
//! # Invariants
//! - Every `Car` carries exactly one `Engine` whose id is never nil.
//! - Identities are UUID v4 values and are never reused.

pub mod car;
pub mod engine;
pub mod validation;

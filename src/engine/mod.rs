//! Infusion calculation engine
//!
//! Pure unit normalization, rate/dose conversion and range validation.
//! Nothing here performs I/O or keeps state between calls.

pub mod converter;
pub mod error;
pub mod range;
pub mod units;

pub use converter::{compute_infusion, Branch, CalculationInput, CalculationResult, DrugRecord};
pub use error::{EngineError, EngineResult, Quantity, UnitKind};
pub use range::{DoseRange, RangeStatus};
pub use units::{
    normalize_concentration, normalize_dose_rate, unit_key, ConcentrationUnit, DoseRateUnit,
};

//! Engine error types

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which family of unit string was being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Concentration,
    DoseRate,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Concentration => "concentration",
            UnitKind::DoseRate => "dose",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-entered quantity named in an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Rate,
    Dose,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Rate => f.write_str("rate"),
            Quantity::Dose => f.write_str("dose"),
        }
    }
}

/// Errors raised by the conversion engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Weight is missing or not positive")]
    MissingWeight,

    #[error("Neither an infusion rate nor a target dose was given")]
    MissingRateOrDose,

    #[error("The entered {quantity} must be positive (got {value})")]
    NegativeQuantity { quantity: Quantity, value: f64 },

    #[error("Unsupported {kind} unit: {unit}")]
    UnsupportedUnit { kind: UnitKind, unit: String },
}

impl EngineError {
    /// True for the recoverable input prompts.
    ///
    /// `UnsupportedUnit` is a catalog defect and must never be shown as a
    /// prompt to the user.
    pub fn is_user_prompt(&self) -> bool {
        matches!(
            self,
            EngineError::MissingWeight
                | EngineError::MissingRateOrDose
                | EngineError::NegativeQuantity { .. }
        )
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_unit_message() {
        let err = EngineError::UnsupportedUnit {
            kind: UnitKind::DoseRate,
            unit: "g/L".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported dose unit: g/L");
        assert!(!err.is_user_prompt());
    }

    #[test]
    fn test_prompts() {
        assert!(EngineError::MissingWeight.is_user_prompt());
        assert!(EngineError::MissingRateOrDose.is_user_prompt());
        let negative = EngineError::NegativeQuantity {
            quantity: Quantity::Rate,
            value: -5.0,
        };
        assert!(negative.is_user_prompt());
        assert_eq!(negative.to_string(), "The entered rate must be positive (got -5)");
    }
}

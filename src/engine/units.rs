//! Unit types and normalization
//!
//! Maps catalog unit strings onto canonical units: micrograms per milliliter
//! for concentration and milligrams per kilogram per hour for dose rate.

use serde::Serialize;

use super::error::{EngineError, EngineResult, UnitKind};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Micrograms per milligram
pub const UG_PER_MG: f64 = 1000.0;
/// Nanograms per milligram
pub const NG_PER_MG: f64 = 1_000_000.0;
/// Minutes per hour
pub const MIN_PER_H: f64 = 60.0;

/// Canonical form of a unit string: all whitespace removed, lower-cased.
pub fn unit_key(unit: &str) -> String {
    unit.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

// ============================================================================
// Concentration
// ============================================================================

/// Supported concentration units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConcentrationUnit {
    /// µg/mL (canonical)
    UgPerMl,
    /// mg/mL
    MgPerMl,
}

impl ConcentrationUnit {
    /// Recognize a unit string, ignoring case and whitespace
    pub fn parse(unit: &str) -> Option<Self> {
        match unit_key(unit).as_str() {
            "µg/ml" | "ug/ml" | "mcg/ml" => Some(ConcentrationUnit::UgPerMl),
            "mg/ml" => Some(ConcentrationUnit::MgPerMl),
            _ => None,
        }
    }

    /// Convert a value in this unit to µg/mL
    pub fn to_ug_per_ml(&self, value: f64) -> f64 {
        match self {
            ConcentrationUnit::UgPerMl => value,
            ConcentrationUnit::MgPerMl => value * UG_PER_MG,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConcentrationUnit::UgPerMl => "µg/mL",
            ConcentrationUnit::MgPerMl => "mg/mL",
        }
    }
}

// ============================================================================
// Dose Rate
// ============================================================================

/// Supported weight-based dose-rate units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoseRateUnit {
    /// mg/kg/h (canonical)
    MgPerKgPerH,
    /// µg/kg/h
    UgPerKgPerH,
    /// µg/kg/min
    UgPerKgPerMin,
    /// ng/kg/min
    NgPerKgPerMin,
}

impl DoseRateUnit {
    /// Recognize a unit string, ignoring case and whitespace
    pub fn parse(unit: &str) -> Option<Self> {
        match unit_key(unit).as_str() {
            "mg/kg/h" | "mg/kg/hr" => Some(DoseRateUnit::MgPerKgPerH),
            "µg/kg/h" | "ug/kg/h" | "mcg/kg/h" => Some(DoseRateUnit::UgPerKgPerH),
            "µg/kg/min" | "ug/kg/min" | "mcg/kg/min" => Some(DoseRateUnit::UgPerKgPerMin),
            "ng/kg/min" => Some(DoseRateUnit::NgPerKgPerMin),
            _ => None,
        }
    }

    /// Convert a value in this unit to mg/kg/h
    pub fn to_mg_per_kg_per_h(&self, value: f64) -> f64 {
        match self {
            DoseRateUnit::MgPerKgPerH => value,
            DoseRateUnit::UgPerKgPerH => value / UG_PER_MG,
            DoseRateUnit::UgPerKgPerMin => (value * MIN_PER_H) / UG_PER_MG,
            DoseRateUnit::NgPerKgPerMin => (value * MIN_PER_H) / NG_PER_MG,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DoseRateUnit::MgPerKgPerH => "mg/kg/h",
            DoseRateUnit::UgPerKgPerH => "µg/kg/h",
            DoseRateUnit::UgPerKgPerMin => "µg/kg/min",
            DoseRateUnit::NgPerKgPerMin => "ng/kg/min",
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a concentration to µg/mL
pub fn normalize_concentration(value: f64, unit: &str) -> EngineResult<f64> {
    ConcentrationUnit::parse(unit)
        .map(|u| u.to_ug_per_ml(value))
        .ok_or_else(|| EngineError::UnsupportedUnit {
            kind: UnitKind::Concentration,
            unit: unit.to_string(),
        })
}

/// Normalize a dose rate to mg/kg/h
pub fn normalize_dose_rate(value: f64, unit: &str) -> EngineResult<f64> {
    DoseRateUnit::parse(unit)
        .map(|u| u.to_mg_per_kg_per_h(value))
        .ok_or_else(|| EngineError::UnsupportedUnit {
            kind: UnitKind::DoseRate,
            unit: unit.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_key() {
        assert_eq!(unit_key(" UG / ML "), "ug/ml");
        assert_eq!(unit_key("mg/kg/\th"), "mg/kg/h");
        assert_eq!(unit_key("µg/mL"), "µg/ml");
    }

    #[test]
    fn test_parse_concentration_aliases() {
        assert_eq!(ConcentrationUnit::parse("µg/mL"), Some(ConcentrationUnit::UgPerMl));
        assert_eq!(ConcentrationUnit::parse("ug/ml"), Some(ConcentrationUnit::UgPerMl));
        assert_eq!(ConcentrationUnit::parse("MCG/ML"), Some(ConcentrationUnit::UgPerMl));
        assert_eq!(ConcentrationUnit::parse("mg / mL"), Some(ConcentrationUnit::MgPerMl));
        assert_eq!(ConcentrationUnit::parse("g/L"), None);
        assert_eq!(ConcentrationUnit::parse(""), None);
    }

    #[test]
    fn test_parse_dose_rate_aliases() {
        assert_eq!(DoseRateUnit::parse("mg/kg/hr"), Some(DoseRateUnit::MgPerKgPerH));
        assert_eq!(DoseRateUnit::parse("mcg/kg/h"), Some(DoseRateUnit::UgPerKgPerH));
        assert_eq!(DoseRateUnit::parse("µg/kg/min"), Some(DoseRateUnit::UgPerKgPerMin));
        assert_eq!(DoseRateUnit::parse("NG/KG/MIN"), Some(DoseRateUnit::NgPerKgPerMin));
        assert_eq!(DoseRateUnit::parse("ng/kg/h"), None);
        assert_eq!(DoseRateUnit::parse("mg/kg"), None);
    }

    #[test]
    fn test_canonical_units_are_identity() {
        assert_eq!(normalize_concentration(42.5, "µg/mL").unwrap(), 42.5);
        assert_eq!(normalize_dose_rate(0.37, "mg/kg/h").unwrap(), 0.37);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let a = normalize_concentration(3.0, "µg/mL").unwrap();
        let b = normalize_concentration(3.0, "ug/ml").unwrap();
        let c = normalize_concentration(3.0, " UG / ML ").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_concentration_factors() {
        assert_eq!(normalize_concentration(4.0, "mg/ml").unwrap(), 4000.0);
        assert_eq!(normalize_concentration(2000.0, "mcg/ml").unwrap(), 2000.0);
    }

    #[test]
    fn test_dose_rate_factors() {
        assert_relative_eq!(normalize_dose_rate(500.0, "ug/kg/h").unwrap(), 0.5);
        assert_relative_eq!(normalize_dose_rate(5.0, "µg/kg/min").unwrap(), 0.3);
        assert_relative_eq!(normalize_dose_rate(100.0, "ng/kg/min").unwrap(), 0.006);
    }

    #[test]
    fn test_unsupported_units_rejected() {
        let err = normalize_concentration(1.0, "g/L").unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedUnit {
                kind: UnitKind::Concentration,
                unit: "g/L".to_string()
            }
        );

        let err = normalize_dose_rate(1.0, "g/L").unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedUnit {
                kind: UnitKind::DoseRate,
                unit: "g/L".to_string()
            }
        );
    }
}

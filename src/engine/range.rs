//! Recommended dose range validation

use serde::{Deserialize, Serialize};

/// Closed recommended interval for the dose rate
///
/// Bounds are taken as mg/kg/h exactly as stored in the catalog. The drug's
/// dose unit label is not applied to them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseRange {
    pub min: f64,
    pub max: f64,
}

/// Position of a dose rate relative to its recommended range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Below,
    Within,
    Above,
}

impl RangeStatus {
    pub fn is_within(&self) -> bool {
        matches!(self, RangeStatus::Within)
    }
}

impl DoseRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, mg_kg_h: f64) -> bool {
        mg_kg_h >= self.min && mg_kg_h <= self.max
    }

    /// Classify a dose rate in mg/kg/h
    pub fn classify(&self, mg_kg_h: f64) -> RangeStatus {
        if self.contains(mg_kg_h) {
            RangeStatus::Within
        } else if mg_kg_h > self.max {
            RangeStatus::Above
        } else {
            // NaN lands here too: it is never in range
            RangeStatus::Below
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DoseRange::new(0.1, 0.5);
        assert_eq!(range.classify(0.1), RangeStatus::Within);
        assert_eq!(range.classify(0.5), RangeStatus::Within);
        assert_eq!(range.classify(0.3), RangeStatus::Within);
    }

    #[test]
    fn test_outside() {
        let range = DoseRange::new(0.1, 0.5);
        assert_eq!(range.classify(0.0999), RangeStatus::Below);
        assert_eq!(range.classify(0.5001), RangeStatus::Above);
        assert!(!range.contains(0.6));
    }

    #[test]
    fn test_nan_is_never_in_range() {
        let range = DoseRange::new(0.0, 10.0);
        assert!(!range.contains(f64::NAN));
        assert!(!range.classify(f64::NAN).is_within());
    }

    #[test]
    fn test_degenerate_range() {
        let range = DoseRange::new(2.0, 2.0);
        assert!(range.classify(2.0).is_within());
        assert_eq!(range.classify(1.0), RangeStatus::Below);
    }
}

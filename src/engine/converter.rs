//! Rate/dose conversion
//!
//! Given a patient weight, a drug's concentration and either an infusion
//! rate or a target dose, computes the other quantity and the derived dose
//! expressions.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult, Quantity};
use super::range::{DoseRange, RangeStatus};
use super::units::{normalize_concentration, normalize_dose_rate, MIN_PER_H, UG_PER_MG};

/// Drug data the engine reads from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub name: String,
    pub concentration: f64,
    pub concentration_unit: String,
    /// Recommended minimum, mg/kg/h
    pub min_dose: f64,
    /// Recommended maximum, mg/kg/h
    pub max_dose: f64,
    /// Unit of a user-entered target dose
    pub dose_unit: String,
}

impl DrugRecord {
    pub fn dose_range(&self) -> DoseRange {
        DoseRange::new(self.min_dose, self.max_dose)
    }
}

/// Inputs for one calculation
///
/// Weight counts as given when it is a finite number above zero. Rate and
/// dose count as given when finite and non-zero; a negative rate or dose
/// is given but rejected, never skipped in favor of the other quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Patient weight, kg
    pub weight: Option<f64>,
    /// Infusion rate, mL/h
    pub rate: Option<f64>,
    /// Target dose in the drug's dose unit
    pub dose: Option<f64>,
}

/// Which quantity the user supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Rate,
    Dose,
}

/// Output of one calculation, full precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    pub branch: Branch,
    pub ml_h: f64,
    pub mg_h: f64,
    pub mg_kg_h: f64,
    pub ug_kg_h: f64,
    pub ug_kg_min: f64,
    pub range_status: RangeStatus,
    pub in_range: bool,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn entered(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn require_positive(quantity: Quantity, value: f64) -> EngineResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::NegativeQuantity { quantity, value })
    }
}

impl CalculationInput {
    pub fn with_rate(weight: f64, rate: f64) -> Self {
        Self {
            weight: Some(weight),
            rate: Some(rate),
            dose: None,
        }
    }

    pub fn with_dose(weight: f64, dose: f64) -> Self {
        Self {
            weight: Some(weight),
            rate: None,
            dose: Some(dose),
        }
    }

    /// Pick the branch for these inputs. Rate wins when both are given.
    pub fn branch(&self) -> EngineResult<Branch> {
        if positive(self.weight).is_none() {
            return Err(EngineError::MissingWeight);
        }
        if entered(self.rate).is_some() {
            Ok(Branch::Rate)
        } else if entered(self.dose).is_some() {
            Ok(Branch::Dose)
        } else {
            Err(EngineError::MissingRateOrDose)
        }
    }
}

/// Compute infusion rate and dose expressions for one drug
pub fn compute_infusion(
    input: &CalculationInput,
    drug: &DrugRecord,
) -> EngineResult<CalculationResult> {
    let branch = input.branch()?;
    let weight = positive(input.weight).ok_or(EngineError::MissingWeight)?;
    let entered_value = match branch {
        Branch::Rate => entered(input.rate)
            .ok_or(EngineError::MissingRateOrDose)
            .and_then(|v| require_positive(Quantity::Rate, v))?,
        Branch::Dose => entered(input.dose)
            .ok_or(EngineError::MissingRateOrDose)
            .and_then(|v| require_positive(Quantity::Dose, v))?,
    };

    let conc_ug_ml = normalize_concentration(drug.concentration, &drug.concentration_unit)?;

    let (ml_h, mg_h) = match branch {
        Branch::Rate => {
            let ml_h = entered_value;
            (ml_h, ml_h * conc_ug_ml / UG_PER_MG)
        }
        Branch::Dose => {
            let dose = entered_value;
            let dose_mg_kg_h = normalize_dose_rate(dose, &drug.dose_unit)?;
            let mg_h = dose_mg_kg_h * weight;
            (mg_h * UG_PER_MG / conc_ug_ml, mg_h)
        }
    };

    let mg_kg_h = mg_h / weight;
    let ug_kg_h = mg_kg_h * UG_PER_MG;
    let ug_kg_min = ug_kg_h / MIN_PER_H;

    let range_status = drug.dose_range().classify(mg_kg_h);

    tracing::debug!(
        drug = %drug.name,
        ?branch,
        ml_h,
        mg_kg_h,
        ?range_status,
        "Computed infusion"
    );

    Ok(CalculationResult {
        branch,
        ml_h,
        mg_h,
        mg_kg_h,
        ug_kg_h,
        ug_kg_min,
        range_status,
        in_range: range_status.is_within(),
    })
}

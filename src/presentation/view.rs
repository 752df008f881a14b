//! Calculator view rendering
//!
//! Turns a catalog entry and the user's inputs into the text a client
//! displays: formatted results, the recommended-range hint and at most one
//! warning.

use serde::Serialize;

use super::i18n::Language;
use crate::engine::{compute_infusion, CalculationInput, CalculationResult, DrugRecord, EngineError};

/// Display precision (decimal places) for each result field
pub const ML_H_DECIMALS: usize = 2;
pub const MG_H_DECIMALS: usize = 3;
pub const MG_KG_H_DECIMALS: usize = 4;
pub const UG_KG_H_DECIMALS: usize = 2;
pub const UG_KG_MIN_DECIMALS: usize = 3;

/// Rendered calculator state. Empty strings are cleared fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorView {
    pub language: Language,
    pub drug_name: String,
    pub concentration: String,
    pub dose_unit: String,
    pub dose_info: String,
    pub ml_h: String,
    pub mg_h: String,
    pub mg_kg_h: String,
    pub ug_kg_h: String,
    pub ug_kg_min: String,
    pub warning: String,
    /// Unrounded engine output, when a calculation succeeded
    pub result: Option<CalculationResult>,
}

impl CalculatorView {
    /// View with every field cleared
    pub fn cleared(language: Language) -> Self {
        Self {
            language,
            drug_name: String::new(),
            concentration: String::new(),
            dose_unit: String::new(),
            dose_info: String::new(),
            ml_h: String::new(),
            mg_h: String::new(),
            mg_kg_h: String::new(),
            ug_kg_h: String::new(),
            ug_kg_min: String::new(),
            warning: String::new(),
            result: None,
        }
    }

    pub fn has_results(&self) -> bool {
        self.result.is_some()
    }
}

/// Recommended-range hint, e.g. `Recommended range: 0.1–0.5 mg/kg/h`
pub fn dose_hint(language: Language, drug: &DrugRecord) -> String {
    format!(
        "{}: {}–{} {}",
        language.strings().recommended,
        drug.min_dose,
        drug.max_dose,
        drug.dose_unit
    )
}

/// Round half-to-even on the exact binary value, so `0.125` gives `"0.12"`.
fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Render the calculator for the selected drug and inputs.
///
/// Missing weight or rate/dose yield a view with a warning and no numbers.
/// An unsupported catalog unit is returned as an error so that no number
/// computed under a guessed unit is ever displayed.
pub fn render(
    language: Language,
    drug: Option<&DrugRecord>,
    input: &CalculationInput,
) -> Result<CalculatorView, EngineError> {
    let Some(drug) = drug else {
        return Ok(CalculatorView::cleared(language));
    };

    let strings = language.strings();
    let mut view = CalculatorView::cleared(language);
    view.drug_name = drug.name.clone();
    view.concentration = format!("{} {}", drug.concentration, drug.concentration_unit);
    view.dose_unit = drug.dose_unit.clone();
    view.dose_info = dose_hint(language, drug);

    let result = match compute_infusion(input, drug) {
        Ok(result) => result,
        Err(EngineError::MissingWeight) => {
            view.warning = strings.warnings.enter_weight.to_string();
            return Ok(view);
        }
        Err(EngineError::MissingRateOrDose) => {
            view.warning = strings.warnings.enter_rate_or_dose.to_string();
            return Ok(view);
        }
        Err(EngineError::NegativeQuantity { .. }) => {
            view.warning = strings.warnings.not_positive.to_string();
            return Ok(view);
        }
        Err(e) => {
            tracing::error!(drug = %drug.name, error = %e, "Catalog entry has an unsupported unit");
            return Err(e);
        }
    };

    view.ml_h = fixed(result.ml_h, ML_H_DECIMALS);
    view.mg_h = fixed(result.mg_h, MG_H_DECIMALS);
    view.mg_kg_h = fixed(result.mg_kg_h, MG_KG_H_DECIMALS);
    view.ug_kg_h = fixed(result.ug_kg_h, UG_KG_H_DECIMALS);
    view.ug_kg_min = fixed(result.ug_kg_min, UG_KG_MIN_DECIMALS);

    if !result.in_range {
        tracing::warn!(
            drug = %drug.name,
            mg_kg_h = result.mg_kg_h,
            min = drug.min_dose,
            max = drug.max_dose,
            "Dose outside recommended range"
        );
        view.warning = strings.warnings.out_of_range.to_string();
    }

    view.result = Some(result);
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug() -> DrugRecord {
        DrugRecord {
            name: "Propofol".to_string(),
            concentration: 4.0,
            concentration_unit: "mg/ml".to_string(),
            min_dose: 0.1,
            max_dose: 0.5,
            dose_unit: "mg/kg/h".to_string(),
        }
    }

    #[test]
    fn test_no_drug_clears_everything() {
        let view = render(Language::En, None, &CalculationInput::with_rate(70.0, 5.0)).unwrap();
        assert_eq!(view, CalculatorView::cleared(Language::En));
        assert!(view.warning.is_empty());
        assert!(view.ml_h.is_empty());
    }

    #[test]
    fn test_formatted_results() {
        let d = drug();
        let view = render(Language::En, Some(&d), &CalculationInput::with_rate(70.0, 5.0)).unwrap();
        assert_eq!(view.ml_h, "5.00");
        assert_eq!(view.mg_h, "20.000");
        assert_eq!(view.mg_kg_h, "0.2857");
        assert_eq!(view.ug_kg_h, "285.71");
        assert_eq!(view.ug_kg_min, "4.762");
        assert_eq!(view.concentration, "4 mg/ml");
        assert_eq!(view.dose_unit, "mg/kg/h");
        assert_eq!(view.dose_info, "Recommended range: 0.1–0.5 mg/kg/h");
        assert!(view.warning.is_empty());
        assert!(view.has_results());
    }

    #[test]
    fn test_missing_weight_prompt() {
        let d = drug();
        let input = CalculationInput {
            weight: None,
            rate: Some(5.0),
            dose: None,
        };
        let view = render(Language::Fi, Some(&d), &input).unwrap();
        assert_eq!(view.warning, "Syötä paino");
        assert!(view.ml_h.is_empty());
        assert!(view.ug_kg_min.is_empty());
        assert!(!view.has_results());
        assert_eq!(view.dose_info, "Suositus: 0.1–0.5 mg/kg/h");
    }

    #[test]
    fn test_missing_rate_or_dose_prompt() {
        let d = drug();
        let input = CalculationInput {
            weight: Some(70.0),
            ..CalculationInput::default()
        };
        let view = render(Language::En, Some(&d), &input).unwrap();
        assert_eq!(view.warning, "Enter rate or dose");
        assert!(view.mg_h.is_empty());
    }

    #[test]
    fn test_negative_rate_prompt_shows_no_numbers() {
        let d = drug();
        let input = CalculationInput {
            weight: Some(70.0),
            rate: Some(-5.0),
            dose: Some(0.3),
        };
        let view = render(Language::En, Some(&d), &input).unwrap();
        assert_eq!(view.warning, "Rate and dose must be positive");
        assert!(view.ml_h.is_empty());
        assert!(!view.has_results());

        let view = render(Language::Fi, Some(&d), &input).unwrap();
        assert_eq!(view.warning, "Nopeuden ja annoksen on oltava positiivisia");
    }

    #[test]
    fn test_cleared_view_keeps_language() {
        let view = CalculatorView::cleared(Language::Fi);
        assert_eq!(view.language, Language::Fi);
        assert!(view.drug_name.is_empty());
        assert!(view.result.is_none());
    }

    #[test]
    fn test_fixed_rounds_half_to_even() {
        // 0.125 is exact in binary; a JS toFixed would give "0.13"
        assert_eq!(fixed(0.125, 2), "0.12");
        assert_eq!(fixed(0.375, 2), "0.38");
        assert_eq!(fixed(2.5, 0), "2");
    }

    #[test]
    fn test_out_of_range_keeps_results() {
        let d = drug();
        let view = render(Language::En, Some(&d), &CalculationInput::with_dose(70.0, 1.0)).unwrap();
        assert_eq!(view.warning, "Dose is outside the recommended range");
        assert_eq!(view.mg_kg_h, "1.0000");
        assert_eq!(view.mg_h, "70.000");
        assert_eq!(view.ml_h, "17.50");
    }

    #[test]
    fn test_unsupported_unit_is_an_error() {
        let mut d = drug();
        d.concentration_unit = "g/L".to_string();
        let err = render(Language::En, Some(&d), &CalculationInput::with_rate(70.0, 5.0));
        assert!(matches!(err, Err(EngineError::UnsupportedUnit { .. })));
    }
}

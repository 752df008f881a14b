//! Calculator MCP Tools
//!
//! Infusion calculation and unit normalization.

use serde::Serialize;

use crate::db::Database;
use crate::engine::{self, CalculationInput, ConcentrationUnit, DoseRateUnit};
use crate::models::{Drug, Settings};
use crate::presentation::{self, CalculatorView, Language};

/// Response for normalize_concentration
#[derive(Debug, Serialize)]
pub struct NormalizeConcentrationResponse {
    pub value: f64,
    pub unit: String,
    pub recognized_as: &'static str,
    pub ug_per_ml: f64,
}

/// Response for normalize_dose_rate
#[derive(Debug, Serialize)]
pub struct NormalizeDoseRateResponse {
    pub value: f64,
    pub unit: String,
    pub recognized_as: &'static str,
    pub mg_per_kg_per_h: f64,
}

/// Response for dose_hint
#[derive(Debug, Serialize)]
pub struct DoseHintResponse {
    pub index: Option<usize>,
    pub dose_info: String,
}

/// Resolve the display language: explicit choice, then stored setting
fn resolve_language(db: &Database, language: Option<&str>) -> Result<Language, String> {
    if let Some(code) = language {
        return Language::from_code(code)
            .ok_or_else(|| format!("Unknown language '{}'. Use 'fi' or 'en'.", code));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let settings = Settings::load(&conn, Language::detect_from_env())
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    Ok(settings.language)
}

fn drug_at(db: &Database, index: usize) -> Result<Drug, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Drug::get_by_index(&conn, index)
        .map_err(|e| format!("Failed to get drug: {}", e))?
        .ok_or_else(|| format!("No drug at catalog index {}", index))
}

/// Calculate infusion rate and doses for a catalog drug.
///
/// With no drug index the cleared view is returned.
pub fn calculate_infusion(
    db: &Database,
    drug_index: Option<usize>,
    input: CalculationInput,
    language: Option<&str>,
) -> Result<CalculatorView, String> {
    let language = resolve_language(db, language)?;

    let drug = match drug_index {
        Some(index) => Some(drug_at(db, index)?.to_record()),
        None => None,
    };

    presentation::render(language, drug.as_ref(), &input).map_err(|e| {
        format!(
            "Cannot calculate for this drug: {}. Fix the catalog entry before use.",
            e
        )
    })
}

/// Recommended range text for a catalog drug
pub fn dose_hint(
    db: &Database,
    drug_index: Option<usize>,
    language: Option<&str>,
) -> Result<DoseHintResponse, String> {
    let language = resolve_language(db, language)?;

    let dose_info = match drug_index {
        Some(index) => presentation::dose_hint(language, &drug_at(db, index)?.to_record()),
        None => String::new(),
    };

    Ok(DoseHintResponse {
        index: drug_index,
        dose_info,
    })
}

/// Normalize a concentration to µg/mL
pub fn normalize_concentration(value: f64, unit: &str) -> Result<NormalizeConcentrationResponse, String> {
    let ug_per_ml = engine::normalize_concentration(value, unit).map_err(|e| e.to_string())?;
    let recognized_as = ConcentrationUnit::parse(unit)
        .map(|u| u.display_name())
        .unwrap_or_default();

    Ok(NormalizeConcentrationResponse {
        value,
        unit: unit.to_string(),
        recognized_as,
        ug_per_ml,
    })
}

/// Normalize a dose rate to mg/kg/h
pub fn normalize_dose_rate(value: f64, unit: &str) -> Result<NormalizeDoseRateResponse, String> {
    let mg_per_kg_per_h = engine::normalize_dose_rate(value, unit).map_err(|e| e.to_string())?;
    let recognized_as = DoseRateUnit::parse(unit)
        .map(|u| u.display_name())
        .unwrap_or_default();

    Ok(NormalizeDoseRateResponse {
        value,
        unit: unit.to_string(),
        recognized_as,
        mg_per_kg_per_h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrugCreate;

    fn catalog() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            Drug::create(
                conn,
                &DrugCreate {
                    name: "Propofol".to_string(),
                    concentration: 10.0,
                    concentration_unit: "mg/ml".to_string(),
                    min_dose: 1.0,
                    max_dose: 4.0,
                    dose_unit: "mg/kg/h".to_string(),
                    notes: None,
                },
            )?;
            Ok(())
        })
        .unwrap();
        db
    }

    #[test]
    fn test_calculate_for_catalog_drug() {
        let db = catalog();
        let view = calculate_infusion(&db, Some(0), CalculationInput::with_rate(70.0, 14.0), Some("en"))
            .unwrap();
        assert_eq!(view.language, Language::En);
        assert_eq!(view.drug_name, "Propofol");
        assert_eq!(view.mg_h, "140.000");
        assert_eq!(view.mg_kg_h, "2.0000");
        assert!(view.warning.is_empty());
    }

    #[test]
    fn test_index_past_catalog_end_is_an_error() {
        let db = catalog();
        let input = CalculationInput::with_rate(70.0, 5.0);

        let err = calculate_infusion(&db, Some(1), input, Some("en")).unwrap_err();
        assert!(err.contains("No drug at catalog index 1"), "{}", err);

        let err = calculate_infusion(&db, Some(usize::MAX), input, Some("en")).unwrap_err();
        assert!(err.contains("No drug at catalog index"), "{}", err);

        assert!(dose_hint(&db, Some(usize::MAX), Some("en")).is_err());
    }

    #[test]
    fn test_no_index_gives_cleared_view() {
        let db = catalog();
        let view = calculate_infusion(&db, None, CalculationInput::with_rate(70.0, 5.0), Some("fi"))
            .unwrap();
        assert_eq!(view, CalculatorView::cleared(Language::Fi));

        let hint = dose_hint(&db, None, Some("fi")).unwrap();
        assert!(hint.dose_info.is_empty());
    }

    #[test]
    fn test_stored_language_used_when_none_given() {
        let db = catalog();
        db.with_conn(|conn| Settings::set_language(conn, Language::En)).unwrap();

        let hint = dose_hint(&db, Some(0), None).unwrap();
        assert_eq!(hint.dose_info, "Recommended range: 1–4 mg/kg/h");
    }

    #[test]
    fn test_unknown_language_rejected() {
        let db = catalog();
        let err = calculate_infusion(&db, Some(0), CalculationInput::default(), Some("sv")).unwrap_err();
        assert_eq!(err, "Unknown language 'sv'. Use 'fi' or 'en'.");
    }

    #[test]
    fn test_normalize_concentration_tool() {
        let resp = normalize_concentration(4.0, " MG/mL").unwrap();
        assert_eq!(resp.ug_per_ml, 4000.0);
        assert_eq!(resp.recognized_as, "mg/mL");

        let err = normalize_concentration(4.0, "g/L").unwrap_err();
        assert_eq!(err, "Unsupported concentration unit: g/L");
    }

    #[test]
    fn test_normalize_dose_rate_tool() {
        let resp = normalize_dose_rate(500.0, "mcg/kg/h").unwrap();
        assert_eq!(resp.mg_per_kg_per_h, 0.5);
        assert_eq!(resp.recognized_as, "µg/kg/h");
        assert!(normalize_dose_rate(1.0, "mg/kg/day").is_err());
    }
}

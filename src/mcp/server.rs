//! Infusion Calculator MCP Server Implementation
//!
//! Implements the MCP server with all calculator tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::engine::CalculationInput;
use crate::models::{DrugCreate, DrugUpdate};
use crate::tools::calculator;
use crate::tools::drugs;
use crate::tools::settings;
use crate::tools::status::StatusTracker;

/// Infusion Calculator MCP Service
#[derive(Clone)]
pub struct InfucalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<InfucalcService>,
}

impl InfucalcService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateInfusionParams {
    /// Catalog index from list_drugs (omit to clear the calculator)
    pub drug_index: Option<usize>,
    /// Patient weight in kg
    pub weight: Option<f64>,
    /// Infusion rate in mL/h (takes precedence over dose)
    pub rate: Option<f64>,
    /// Target dose in the drug's dose unit
    pub dose: Option<f64>,
    /// Language for labels and warnings: fi or en (default: stored setting)
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeParams {
    /// Numeric value
    pub value: f64,
    /// Unit string, e.g. "mg/mL" or "mcg/kg/min"
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DoseHintParams {
    /// Catalog index from list_drugs
    pub drug_index: Option<usize>,
    /// Language: fi or en (default: stored setting)
    pub language: Option<String>,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddDrugParams {
    /// Drug name
    pub name: String,
    /// Concentration of the prepared solution
    pub concentration: f64,
    /// Concentration unit: mg/mL or µg/mL (ug/ml, mcg/ml)
    pub concentration_unit: String,
    /// Recommended minimum dose, mg/kg/h
    pub min_dose: f64,
    /// Recommended maximum dose, mg/kg/h
    pub max_dose: f64,
    /// Unit for entering a target dose: mg/kg/h, µg/kg/h, µg/kg/min or ng/kg/min
    pub dose_unit: String,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDrugParams {
    /// Drug ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDrugsParams {
    /// Optional name filter
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateDrugParams {
    /// Drug ID to update
    pub id: i64,
    pub name: Option<String>,
    pub concentration: Option<f64>,
    pub concentration_unit: Option<String>,
    pub min_dose: Option<f64>,
    pub max_dose: Option<f64>,
    pub dose_unit: Option<String>,
    /// New notes; an empty string clears them
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteDrugParams {
    /// Drug ID to delete
    pub id: i64,
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetLanguageParams {
    /// fi or en
    pub language: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetThemeParams {
    /// light or dark
    pub theme: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl InfucalcService {
    // ========================================================================
    // Status Tools
    // ========================================================================

    #[tool(description = "Get the current status of the infusion calculator including build info, database status, and process information")]
    async fn infucalc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json(&status)
    }

    #[tool(description = "Get instructions for using the infusion calculator: workflow, precedence rules, supported units and warnings. Call this before the first calculation.")]
    fn calculator_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CALCULATOR_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CALCULATOR_INSTRUCTIONS)]))
    }

    // ========================================================================
    // Calculator Tools
    // ========================================================================

    #[tool(description = "Calculate infusion rate and dose for a catalog drug from weight and either rate (mL/h) or target dose. Rate wins if both are given. Returns formatted fields, a localized warning, and the raw result.")]
    fn calculate_infusion(&self, Parameters(p): Parameters<CalculateInfusionParams>) -> Result<CallToolResult, McpError> {
        let input = CalculationInput {
            weight: p.weight,
            rate: p.rate,
            dose: p.dose,
        };
        let result = calculator::calculate_infusion(&self.database, p.drug_index, input, p.language.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a concentration to µg/mL. Accepts µg/mL, ug/ml, mcg/ml, mg/mL (case and spaces ignored).")]
    fn normalize_concentration(&self, Parameters(p): Parameters<NormalizeParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::normalize_concentration(p.value, &p.unit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a weight-based dose rate to mg/kg/h. Accepts mg/kg/h, mg/kg/hr, µg/kg/h, µg/kg/min, ng/kg/min and ug/mcg spellings.")]
    fn normalize_dose_rate(&self, Parameters(p): Parameters<NormalizeParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::normalize_dose_rate(p.value, &p.unit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the recommended dose range text for a catalog drug")]
    fn dose_hint(&self, Parameters(p): Parameters<DoseHintParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::dose_hint(&self.database, p.drug_index, p.language.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // ========================================================================
    // Catalog Tools
    // ========================================================================

    #[tool(description = "Add a drug to the end of the catalog. Units are validated; bounds are mg/kg/h with min <= max.")]
    fn add_drug(&self, Parameters(p): Parameters<AddDrugParams>) -> Result<CallToolResult, McpError> {
        let data = DrugCreate {
            name: p.name,
            concentration: p.concentration,
            concentration_unit: p.concentration_unit,
            min_dose: p.min_dose,
            max_dose: p.max_dose,
            dose_unit: p.dose_unit,
            notes: p.notes,
        };
        let result = drugs::add_drug(&self.database, data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get full details for a catalog drug by ID")]
    fn get_drug(&self, Parameters(p): Parameters<GetDrugParams>) -> Result<CallToolResult, McpError> {
        let result = drugs::get_drug(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(drug) => to_json(&drug),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Drug not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List the drug catalog in display order with each entry's index")]
    fn list_drugs(&self, Parameters(p): Parameters<ListDrugsParams>) -> Result<CallToolResult, McpError> {
        let result = drugs::list_drugs(&self.database, p.query.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a catalog drug. The updated entry is validated as a whole.")]
    fn update_drug(&self, Parameters(p): Parameters<UpdateDrugParams>) -> Result<CallToolResult, McpError> {
        let data = DrugUpdate {
            name: p.name,
            concentration: p.concentration,
            concentration_unit: p.concentration_unit,
            min_dose: p.min_dose,
            max_dose: p.max_dose,
            dose_unit: p.dose_unit,
            notes: p.notes,
        };
        let result = drugs::update_drug(&self.database, p.id, data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        match result {
            Some(drug) => to_json(&drug),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Drug not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Delete a catalog drug. Later entries move up one index.")]
    fn delete_drug(&self, Parameters(p): Parameters<DeleteDrugParams>) -> Result<CallToolResult, McpError> {
        let result = drugs::delete_drug(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // ========================================================================
    // Settings Tools
    // ========================================================================

    #[tool(description = "Get the current language and theme")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set the display language (fi or en)")]
    fn set_language(&self, Parameters(p): Parameters<SetLanguageParams>) -> Result<CallToolResult, McpError> {
        let result = settings::set_language(&self.database, &p.language)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Switch between Finnish and English")]
    fn toggle_language(&self) -> Result<CallToolResult, McpError> {
        let result = settings::toggle_language(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set the theme (light or dark)")]
    fn set_theme(&self, Parameters(p): Parameters<SetThemeParams>) -> Result<CallToolResult, McpError> {
        let result = settings::set_theme(&self.database, &p.theme)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Switch between light and dark theme")]
    fn toggle_theme(&self) -> Result<CallToolResult, McpError> {
        let result = settings::toggle_theme(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for InfucalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "infucalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Infusion Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Infusion Calculator - weight-based infusion rate and dose conversion. \
                 IMPORTANT: Call calculator_instructions before the first calculation. \
                 Calculate: calculate_infusion (drug_index + weight + rate OR dose), dose_hint. \
                 Units: normalize_concentration, normalize_dose_rate. \
                 Catalog: add/get/list/update/delete_drug. \
                 Settings: get_settings, set_language/toggle_language, set_theme/toggle_theme. \
                 Always relay out-of-range warnings to the clinician."
                    .into(),
            ),
        }
    }
}

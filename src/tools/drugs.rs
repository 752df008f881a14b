//! Drug Catalog MCP Tools
//!
//! Tools for maintaining the ordered drug catalog the calculator reads from.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Drug, DrugCreate, DrugUpdate};

/// Catalog entry as listed, with its index
#[derive(Debug, Serialize)]
pub struct DrugSummary {
    pub index: usize,
    pub id: i64,
    pub name: String,
    pub concentration: String,
    pub recommended: String,
}

impl DrugSummary {
    fn new(index: usize, drug: &Drug) -> Self {
        Self {
            index,
            id: drug.id,
            name: drug.name.clone(),
            concentration: format!("{} {}", drug.concentration, drug.concentration_unit),
            recommended: format!("{}–{} {}", drug.min_dose, drug.max_dose, drug.dose_unit),
        }
    }
}

/// Response for list_drugs
#[derive(Debug, Serialize)]
pub struct ListDrugsResponse {
    pub drugs: Vec<DrugSummary>,
    pub total: usize,
}

/// Response for add_drug
#[derive(Debug, Serialize)]
pub struct AddDrugResponse {
    pub id: i64,
    pub index: usize,
    pub name: String,
    pub created_at: String,
}

/// Response for delete_drug
#[derive(Debug, Serialize)]
pub struct DeleteDrugResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Append a drug to the catalog
pub fn add_drug(db: &Database, data: DrugCreate) -> Result<AddDrugResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let drug = Drug::create(&conn, &data).map_err(|e| format!("Failed to add drug: {}", e))?;
    let total = Drug::count(&conn).map_err(|e| format!("Failed to count drugs: {}", e))?;

    Ok(AddDrugResponse {
        id: drug.id,
        index: (total as usize).saturating_sub(1),
        name: drug.name,
        created_at: drug.created_at,
    })
}

/// Get a drug by ID
pub fn get_drug(db: &Database, id: i64) -> Result<Option<Drug>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Drug::get_by_id(&conn, id).map_err(|e| format!("Failed to get drug: {}", e))
}

/// List the catalog in display order, optionally filtered by name.
///
/// Indices always refer to the unfiltered catalog.
pub fn list_drugs(db: &Database, query: Option<&str>) -> Result<ListDrugsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let all = Drug::list(&conn).map_err(|e| format!("Failed to list drugs: {}", e))?;
    let needle = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

    let drugs: Vec<DrugSummary> = all
        .iter()
        .enumerate()
        .filter(|(_, d)| match &needle {
            Some(q) => d.name.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .map(|(i, d)| DrugSummary::new(i, d))
        .collect();

    let total = drugs.len();
    Ok(ListDrugsResponse { drugs, total })
}

/// Update a catalog entry
pub fn update_drug(db: &Database, id: i64, data: DrugUpdate) -> Result<Option<Drug>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Drug::update(&conn, id, &data).map_err(|e| format!("Failed to update drug: {}", e))
}

/// Remove a catalog entry
pub fn delete_drug(db: &Database, id: i64) -> Result<DeleteDrugResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Drug::delete(&conn, id).map_err(|e| format!("Failed to delete drug: {}", e))?;
    if !deleted {
        return Err(format!("Drug {} not found", id));
    }

    Ok(DeleteDrugResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> DrugCreate {
        DrugCreate {
            name: name.to_string(),
            concentration: 50.0,
            concentration_unit: "µg/ml".to_string(),
            min_dose: 0.01,
            max_dose: 0.1,
            dose_unit: "µg/kg/min".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_add_reports_catalog_index() {
        let db = Database::in_memory().unwrap();
        assert_eq!(add_drug(&db, entry("Noradrenaline")).unwrap().index, 0);
        assert_eq!(add_drug(&db, entry("Adrenaline")).unwrap().index, 1);

        let mut bad = entry("Broken");
        bad.dose_unit = "mg/day".to_string();
        assert!(add_drug(&db, bad).unwrap_err().starts_with("Failed to add drug"));
    }

    #[test]
    fn test_filtered_list_keeps_catalog_indices() {
        let db = Database::in_memory().unwrap();
        add_drug(&db, entry("Noradrenaline")).unwrap();
        add_drug(&db, entry("Dobutamine")).unwrap();
        add_drug(&db, entry("Adrenaline")).unwrap();

        let all = list_drugs(&db, None).unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.drugs[2].recommended, "0.01–0.1 µg/kg/min");

        let found = list_drugs(&db, Some(" ADRENALINE ")).unwrap();
        let indices: Vec<_> = found.drugs.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(found.drugs[1].name, "Adrenaline");
    }

    #[test]
    fn test_delete_missing_drug_is_an_error() {
        let db = Database::in_memory().unwrap();
        let added = add_drug(&db, entry("Noradrenaline")).unwrap();

        assert!(delete_drug(&db, added.id).unwrap().success);
        assert_eq!(
            delete_drug(&db, added.id).unwrap_err(),
            format!("Drug {} not found", added.id)
        );
        assert!(get_drug(&db, added.id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_drug_returns_none() {
        let db = Database::in_memory().unwrap();
        let update = DrugUpdate {
            max_dose: Some(0.2),
            ..Default::default()
        };
        assert!(update_drug(&db, 42, update).unwrap().is_none());
    }
}

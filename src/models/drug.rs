//! Drug catalog model
//!
//! Catalog entries supply concentration, recommended dose bounds and dose
//! unit to the calculator. Entries are addressed by their position in the
//! ordered catalog.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::engine::{ConcentrationUnit, DoseRateUnit, DrugRecord};

/// A drug catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drug {
    pub id: i64,
    pub position: i64,
    pub name: String,
    pub concentration: f64,
    pub concentration_unit: String,
    pub min_dose: f64,
    pub max_dose: f64,
    pub dose_unit: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugCreate {
    pub name: String,
    pub concentration: f64,
    pub concentration_unit: String,
    pub min_dose: f64,
    pub max_dose: f64,
    pub dose_unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Data for updating a catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrugUpdate {
    pub name: Option<String>,
    pub concentration: Option<f64>,
    pub concentration_unit: Option<String>,
    pub min_dose: Option<f64>,
    pub max_dose: Option<f64>,
    pub dose_unit: Option<String>,
    /// A blank string clears the notes
    pub notes: Option<String>,
}

/// Check the catalog contract: known units, positive concentration,
/// ordered bounds.
pub fn validate_drug_fields(
    name: &str,
    concentration: f64,
    concentration_unit: &str,
    min_dose: f64,
    max_dose: f64,
    dose_unit: &str,
) -> DbResult<()> {
    if name.trim().is_empty() {
        return Err(DbError::Invalid("drug name cannot be empty".to_string()));
    }
    if !(concentration.is_finite() && concentration > 0.0) {
        return Err(DbError::Invalid(format!(
            "concentration must be greater than 0 (got {})",
            concentration
        )));
    }
    if ConcentrationUnit::parse(concentration_unit).is_none() {
        return Err(DbError::Invalid(format!(
            "unsupported concentration unit '{}'",
            concentration_unit
        )));
    }
    if DoseRateUnit::parse(dose_unit).is_none() {
        return Err(DbError::Invalid(format!("unsupported dose unit '{}'", dose_unit)));
    }
    if !(min_dose.is_finite() && max_dose.is_finite()) || min_dose > max_dose {
        return Err(DbError::Invalid(format!(
            "dose range {}..{} is not a valid interval",
            min_dose, max_dose
        )));
    }
    Ok(())
}

impl DrugCreate {
    pub fn validate(&self) -> DbResult<()> {
        validate_drug_fields(
            &self.name,
            self.concentration,
            &self.concentration_unit,
            self.min_dose,
            self.max_dose,
            &self.dose_unit,
        )
    }
}

impl Drug {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            name: row.get("name")?,
            concentration: row.get("concentration")?,
            concentration_unit: row.get("concentration_unit")?,
            min_dose: row.get("min_dose")?,
            max_dose: row.get("max_dose")?,
            dose_unit: row.get("dose_unit")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The engine's view of this entry
    pub fn to_record(&self) -> DrugRecord {
        DrugRecord {
            name: self.name.clone(),
            concentration: self.concentration,
            concentration_unit: self.concentration_unit.clone(),
            min_dose: self.min_dose,
            max_dose: self.max_dose,
            dose_unit: self.dose_unit.clone(),
        }
    }

    /// Append a new entry at the end of the catalog
    pub fn create(conn: &Connection, data: &DrugCreate) -> DbResult<Self> {
        data.validate()?;

        conn.execute(
            r#"
            INSERT INTO drugs (
                position, name, concentration, concentration_unit,
                min_dose, max_dose, dose_unit, notes
            )
            VALUES (
                (SELECT COALESCE(MAX(position), -1) + 1 FROM drugs),
                ?1, ?2, ?3, ?4, ?5, ?6, ?7
            )
            "#,
            params![
                data.name.trim(),
                data.concentration,
                data.concentration_unit,
                data.min_dose,
                data.max_dose,
                data.dose_unit,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(id, name = %data.name, "Added drug to catalog");
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM drugs WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(drug) => Ok(Some(drug)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the entry at a 0-based catalog index
    pub fn get_by_index(conn: &Connection, index: usize) -> DbResult<Option<Self>> {
        // SQLite offsets are i64; anything larger is past the end
        let Ok(offset) = i64::try_from(index) else {
            return Ok(None);
        };

        let mut stmt =
            conn.prepare("SELECT * FROM drugs ORDER BY position, id LIMIT 1 OFFSET ?1")?;

        match stmt.query_row([offset], Self::from_row) {
            Ok(drug) => Ok(Some(drug)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the whole catalog in display order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM drugs ORDER BY position, id")?;
        let drugs = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(drugs)
    }

    /// Update an entry; the merged result must still satisfy the catalog contract
    pub fn update(conn: &Connection, id: i64, data: &DrugUpdate) -> DbResult<Option<Self>> {
        let Some(current) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        let name = data.name.clone().unwrap_or(current.name);
        let concentration = data.concentration.unwrap_or(current.concentration);
        let concentration_unit = data
            .concentration_unit
            .clone()
            .unwrap_or(current.concentration_unit);
        let min_dose = data.min_dose.unwrap_or(current.min_dose);
        let max_dose = data.max_dose.unwrap_or(current.max_dose);
        let dose_unit = data.dose_unit.clone().unwrap_or(current.dose_unit);
        let notes = match &data.notes {
            Some(n) if n.trim().is_empty() => None,
            Some(n) => Some(n.clone()),
            None => current.notes,
        };

        validate_drug_fields(
            &name,
            concentration,
            &concentration_unit,
            min_dose,
            max_dose,
            &dose_unit,
        )?;

        conn.execute(
            r#"
            UPDATE drugs SET
                name = ?1,
                concentration = ?2,
                concentration_unit = ?3,
                min_dose = ?4,
                max_dose = ?5,
                dose_unit = ?6,
                notes = ?7,
                updated_at = datetime('now')
            WHERE id = ?8
            "#,
            params![
                name.trim(),
                concentration,
                concentration_unit,
                min_dose,
                max_dose,
                dose_unit,
                notes,
                id
            ],
        )?;

        tracing::info!(id, "Updated drug");
        Self::get_by_id(conn, id)
    }

    /// Delete an entry; later entries move up one index
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM drugs WHERE id = ?1", [id])?;
        if rows > 0 {
            tracing::info!(id, "Deleted drug");
        }
        Ok(rows > 0)
    }

    /// Count catalog entries
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM drugs", [], |row| row.get(0))?;
        Ok(count)
    }
}

//! Settings MCP Tools

use crate::db::Database;
use crate::models::{Settings, Theme};
use crate::presentation::Language;

fn load(db: &Database) -> Result<Settings, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Settings::load(&conn, Language::detect_from_env())
        .map_err(|e| format!("Failed to load settings: {}", e))
}

/// Current settings (persisted values or detected defaults)
pub fn get_settings(db: &Database) -> Result<Settings, String> {
    load(db)
}

pub fn set_language(db: &Database, code: &str) -> Result<Settings, String> {
    let language = Language::from_code(code)
        .ok_or_else(|| format!("Unknown language '{}'. Use 'fi' or 'en'.", code))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Settings::set_language(&conn, language)
        .map_err(|e| format!("Failed to save language: {}", e))?;
    drop(conn);

    load(db)
}

pub fn toggle_language(db: &Database) -> Result<Settings, String> {
    let current = load(db)?;
    set_language(db, current.language.toggle().as_str())
}

pub fn set_theme(db: &Database, theme: &str) -> Result<Settings, String> {
    let theme = Theme::from_str(theme)
        .ok_or_else(|| format!("Unknown theme '{}'. Use 'light' or 'dark'.", theme))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Settings::set_theme(&conn, theme).map_err(|e| format!("Failed to save theme: {}", e))?;
    drop(conn);

    load(db)
}

pub fn toggle_theme(db: &Database) -> Result<Settings, String> {
    let current = load(db)?;
    set_theme(db, current.theme.toggle().as_str())
}

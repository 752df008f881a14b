//! Settings model
//!
//! Persisted display preferences: language and theme.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::presentation::Language;

const LANGUAGE_KEY: &str = "language";
const THEME_KEY: &str = "theme";

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Display settings handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
}

fn get_value(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn set_value(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        params![key, value],
    )?;
    Ok(())
}

impl Settings {
    /// Load persisted settings. A missing or unreadable language falls back
    /// to `default_language`; a missing theme is light.
    pub fn load(conn: &Connection, default_language: Language) -> DbResult<Self> {
        let language = get_value(conn, LANGUAGE_KEY)?
            .and_then(|code| Language::from_code(&code))
            .unwrap_or(default_language);
        let theme = get_value(conn, THEME_KEY)?
            .and_then(|t| Theme::from_str(&t))
            .unwrap_or_default();

        Ok(Self { language, theme })
    }

    pub fn set_language(conn: &Connection, language: Language) -> DbResult<()> {
        set_value(conn, LANGUAGE_KEY, language.as_str())
    }

    pub fn set_theme(conn: &Connection, theme: Theme) -> DbResult<()> {
        set_value(conn, THEME_KEY, theme.as_str())
    }
}

//! Utility to load a drug list into the catalog
//!
//! Usage: `import_catalog <drugs.json>`
//!
//! The file holds a JSON array of entries:
//! `{"name", "concentration", "concentration_unit", "min_dose", "max_dose", "dose_unit", "notes"?}`.
//! Entries are appended in file order; invalid entries are reported and skipped.

use std::path::PathBuf;

use infucalc::models::{Drug, DrugCreate};

fn get_database_path() -> PathBuf {
    std::env::var("INFUCALC_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("infucalc.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let file = std::env::args()
        .nth(1)
        .ok_or("usage: import_catalog <drugs.json>")?;

    let entries: Vec<DrugCreate> = serde_json::from_str(&std::fs::read_to_string(&file)?)?;

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = infucalc::db::Database::new(&db_path)?;

    let (imported, failed) = database.with_conn(|conn| {
        infucalc::db::migrations::run_migrations(conn)?;

        let mut imported = 0usize;
        let mut failed = 0usize;
        for (i, entry) in entries.iter().enumerate() {
            match Drug::create(conn, entry) {
                Ok(drug) => {
                    imported += 1;
                    println!("  + {} (id {})", drug.name, drug.id);
                }
                Err(e) => {
                    failed += 1;
                    eprintln!("  ! entry {} '{}': {}", i, entry.name, e);
                }
            }
        }
        Ok((imported, failed))
    })?;

    println!("Imported {} drugs, {} rejected", imported, failed);
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

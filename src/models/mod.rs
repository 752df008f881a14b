//! Data models
//!
//! Rust structs representing database entities.

mod drug;
mod settings;

pub use drug::{validate_drug_fields, Drug, DrugCreate, DrugUpdate};
pub use settings::{Settings, Theme};

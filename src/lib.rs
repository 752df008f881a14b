//! Infusion Calculator (infucalc) Library
//!
//! Unit-normalized conversion between infusion rate and weight-based dose,
//! with a drug catalog and an MCP tool surface.

pub mod build_info;
pub mod db;
pub mod engine;
pub mod mcp;
pub mod models;
pub mod presentation;
pub mod tools;

//! Tools module
//!
//! MCP tool implementations for the infusion calculator.

pub mod calculator;
pub mod drugs;
pub mod settings;
pub mod status;

//! Status Tool
//!
//! Runtime status of the calculator service and the usage guide.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::migrations::SCHEMA_VERSION;

/// Calculator instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Infusion Calculator Instructions

Computes a continuous infusion for one drug from the catalog: give the
patient weight and EITHER the pump rate OR the target dose, and the
calculator returns the other one plus the dose in several units.

## Workflow

1. `list_drugs` - find the drug and note its `index`
2. `calculate_infusion` with:
   - `drug_index` - catalog index from step 1
   - `weight` - kg
   - `rate` - mL/h, **or**
   - `dose` - target dose in the drug's dose unit (shown as `dose_unit`)
3. Read the result fields:

| Field | Unit | Decimals |
|-------|------|----------|
| ml_h | mL/h | 2 |
| mg_h | mg/h | 3 |
| mg_kg_h | mg/kg/h | 4 |
| ug_kg_h | µg/kg/h | 2 |
| ug_kg_min | µg/kg/min | 3 |

## Rules

- If both `rate` and `dose` are given, **rate wins** and dose is ignored.
- Zero or missing values count as not given. A negative rate or dose is
  refused with the "Rate and dose must be positive" warning and no numbers;
  it never falls through to the other quantity.
- Without weight the response carries the "Enter weight" warning and no numbers.
- Without rate and dose it carries "Enter rate or dose" and no numbers.
- A dose outside the recommended range still returns numbers, with the
  out-of-range warning. Always relay that warning to the clinician.
- Recommended ranges are stored in mg/kg/h and compared against `mg_kg_h`.

## Supported Units

**Concentration:** µg/mL (ug/ml, mcg/ml), mg/mL
**Dose:** mg/kg/h (mg/kg/hr), µg/kg/h (ug/kg/h, mcg/kg/h),
µg/kg/min (ug/kg/min, mcg/kg/min), ng/kg/min

Case and spaces are ignored. Any other unit is refused: `add_drug` rejects
it, and a calculation on such an entry fails instead of guessing.

## Catalog

- `add_drug` appends at the end; `delete_drug` shifts later indices up.
- Bounds must satisfy min <= max and concentration must be positive.

## Settings

`set_language` / `toggle_language` (fi, en) and `set_theme` /
`toggle_theme` (light, dark). The language is used for labels and warnings
unless `calculate_infusion` is given an explicit `language`.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct InfucalcStatus {
    /// Build information
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> InfucalcStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        InfucalcStatus {
            build_profile: build_info.profile,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version: SCHEMA_VERSION,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_build_and_schema() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/infucalc.db"));
        let status = tracker.get_status();
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(status.build_profile, BuildInfo::current().profile);
        assert_eq!(status.schema_version, SCHEMA_VERSION);
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.process_id, std::process::id());
    }
}

//! Compile-time build metadata

use serde::Serialize;

/// Cargo profile the binary was built with (`debug` or `release`)
pub const BUILD_PROFILE: &str = match option_env!("INFUCALC_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

/// Compile time, ISO 8601 UTC
pub const BUILD_TIMESTAMP: &str = match option_env!("INFUCALC_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub profile: &'static str,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            profile: BUILD_PROFILE,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    pub fn is_release(&self) -> bool {
        self.profile == "release"
    }
}

/// Log the startup banner
pub fn log_startup_banner() {
    let info = BuildInfo::current();
    if !info.is_release() {
        tracing::warn!(profile = info.profile, "Running a non-release build");
    }
    tracing::info!(
        version = info.version,
        profile = info.profile,
        compiled = info.build_timestamp,
        "Infusion Calculator (infucalc) starting"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_uses_package_metadata() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "infucalc");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_profile_embedded_by_build_script() {
        let info = BuildInfo::current();
        assert!(matches!(info.profile, "debug" | "release"));
        assert_eq!(info.is_release(), info.profile == "release");
        // e.g. 2026-10-18T09:30:00Z
        assert_eq!(info.build_timestamp.len(), 20);
        assert!(info.build_timestamp.ends_with('Z'));
    }
}

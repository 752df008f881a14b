//! Embeds the build profile and compile time for the status tool.

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=PROFILE");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=INFUCALC_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=INFUCALC_BUILD_TIMESTAMP={}", timestamp);
}

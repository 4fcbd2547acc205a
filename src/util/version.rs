//! Library version string.

/// Crate version from Cargo metadata.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format the version string printed by the CLI, stamped with the build date.
pub fn library_version() -> String {
    let built = option_env!("CLX_BUILT_AT").unwrap_or("unknown");
    format!("clx {} (built {})", LIBRARY_VERSION, built)
}

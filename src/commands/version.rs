//! Command: print version information.

/// Version string injected by `build.rs`, or the package version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PROVISION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the provision version to stdout.
pub fn run() {
    println!("provision {}", version());
}

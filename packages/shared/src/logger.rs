//! Logging setup utilities for the Spinwheel binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled at the default log level.
const WORKSPACE_CRATES: [&str; 3] = ["spinwheel_core", "spinwheel_host", "spinwheel_shared"];

/// Build the default filter directive for the workspace crates and the binary.
///
/// # Examples
///
/// ```
/// use spinwheel_shared::logger::default_directive;
///
/// let directive = default_directive("spinwheel", "debug");
/// assert!(directive.contains("spinwheel_core=debug"));
/// assert!(directive.ends_with("spinwheel=debug"));
/// ```
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, default_log_level))
        .collect();
    directives.push(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    ));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "spinwheel")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use spinwheel_shared::logger::setup_logger;
///
/// setup_logger("spinwheel", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

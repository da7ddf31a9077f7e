//! Logging setup utilities for the Hiroba relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the calling package and its binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `package_name` - The calling package name (e.g., `env!("CARGO_PKG_NAME")`)
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger(env!("CARGO_PKG_NAME"), "hiroba-server", "debug");
/// ```
pub fn setup_logger(package_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(package_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the `EnvFilter` directives used when `RUST_LOG` is unset.
///
/// Crate and binary names are converted to their module form (`-` to `_`).
pub fn default_directives(package_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let mut directives = vec![
        format!("{}={}", package_name.replace('-', "_"), default_log_level),
        format!("{}={}", binary_name.replace('-', "_"), default_log_level),
        format!("tower_http={}", default_log_level),
    ];
    directives.dedup();
    directives.join(",")
}

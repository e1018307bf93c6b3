//! BDL Tools
//!
//! Command-line front-end of the Bridge Description Language interpreter.

pub mod commands;

pub use commands::{CommandError, generate, graph, validate};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `warn`. Logs go to stderr, stdout only carries command output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

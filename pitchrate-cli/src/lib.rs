pub mod goals_assists;
pub mod pass_accuracy;
pub mod report;
pub mod roster;
pub mod settings;
pub mod source;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs to stderr, filtered by `RUST_LOG` (default `info`), keeping stdout
/// free for reports.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

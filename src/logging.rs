use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Installs the stdout subscriber. `RUST_LOG` is honoured unless `verbose`
/// forces debug output.
pub fn init(verbose: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .try_init()
}

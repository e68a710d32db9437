use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "charge_pipeline=info";

/// Initializes console logging on stderr.
///
/// `RUST_LOG` wins over the default `charge_pipeline=info`; `verbose`
/// raises the default to debug.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "charge_pipeline=debug"
    } else {
        DEFAULT_DIRECTIVE
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

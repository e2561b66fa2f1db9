use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "assignment_priority=debug"
    } else {
        "assignment_priority=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

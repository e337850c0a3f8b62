use tracing_subscriber::EnvFilter;

/// Installs the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "best_dl=debug" } else { "best_dl=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Keep the first subscriber if one is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

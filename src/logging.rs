// Logging setup. Logs go to stderr so they never interleave with the
// interactive prompts on stdout.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
/// Calling it twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "fit4ever_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

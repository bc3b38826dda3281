//! Diagnostic logging to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output for
/// the cangen crates with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,cangen=debug,cangen_codegen=debug,cangen_codegen_c=debug,cangen_codegen_java=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

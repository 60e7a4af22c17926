use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins unless `-v` was given.
pub fn init(verbosity: u8) {
    let env_filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("sandbox_core=debug,sandbox_cli=debug,info"),
        _ => EnvFilter::new("sandbox_core=trace,sandbox_cli=trace,info"),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// `RUST_LOG` wins over the `--verbose` level.
pub fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "cep_lookup=debug,info"
    } else {
        "cep_lookup=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Logs go to stderr; stdout only carries the final summary line.
pub fn init_logger(verbose: bool, format: LogFormat) {
    let (compact, json) = match format {
        LogFormat::Compact => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(compact)
        .with(json)
        .init();
}

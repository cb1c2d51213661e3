use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output shape of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output for terminals.
    Compact,
    /// One JSON object per event, no timestamp (CloudWatch adds its own).
    Json,
    /// Compact output routed through the libtest capture.
    Test,
}

/// Directive used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "lambda_testnet=debug,testcontainers=info,warn"
    } else {
        "lambda_testnet=info,warn"
    }
}

fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn install(format: LogFormat, filter: EnvFilter) -> bool {
    let registry = tracing_subscriber::registry().with(filter);
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let result = match format {
        LogFormat::Compact => registry.with(fmt.compact()).try_init(),
        LogFormat::Json => registry.with(fmt.without_time().json()).try_init(),
        LogFormat::Test => registry.with(fmt.with_test_writer().compact()).try_init(),
    };
    result.is_ok()
}

pub fn init_cli_logger(verbose: bool) {
    install(LogFormat::Compact, filter(default_directive(verbose)));
}

pub fn init_lambda_logger() {
    install(LogFormat::Json, filter("info"));
}

/// Logger for test binaries. Safe to call more than once.
pub fn init_test_logger() {
    install(LogFormat::Test, filter(default_directive(true)));
}

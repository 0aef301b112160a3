//! Logging setup shared by binaries and tests in the workspace.

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Configure the global tracing subscriber.
///
/// `RUST_LOG` directives take precedence over `default_level`. Errors if a
/// global subscriber has already been set.
pub fn configure_global_logger(
    default_level: Level,
    format: LogFormat,
) -> Result<(), SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_level))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::HumanReadable => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
}

/// Install a subscriber that writes through the test harness so output is
/// captured per test.
///
/// Safe to call from every test, only the first call installs anything.
pub fn init_test() {
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter(Level::DEBUG))
        .with_file(true)
        .with_line_number(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

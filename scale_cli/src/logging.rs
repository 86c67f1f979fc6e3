//! Tracing subscriber setup: console layer on stderr plus an optional file sink.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use tracing_appender::non_blocking::WorkerGuard;
use scale_config::{Logging, Rotation};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. The returned guard flushes the file
/// sink on drop and must outlive the command.
pub fn init_tracing(json: bool, level: &str, logging: &Logging) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file = logging.file.as_deref().map(|path| {
        let path = std::path::Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "scale.log".into());
        let appender = match logging.rotation {
            Rotation::Never => tracing_appender::rolling::never(dir, name),
            Rotation::Daily => tracing_appender::rolling::daily(dir, name),
            Rotation::Hourly => tracing_appender::rolling::hourly(dir, name),
        };
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();
    guard
}

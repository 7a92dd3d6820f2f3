//! Logging setup: stderr output via `tracing_subscriber::fmt`, plus a
//! non-blocking per-agent debug log (`logs/<agent-name>/debug.log`, spec
//! §6) when the invocation names a real agent file.

use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Keeps the per-agent file writer's background thread alive for the
/// process lifetime; dropping it would stop flushing queued log lines.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

pub fn init(agent_name: Option<&str>) -> LoggingGuard {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::from_default_env());

    let (file_layer, guard) = match agent_name.and_then(file_layer_for) {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok();

    LoggingGuard { _file_guard: guard }
}

type BoxedLayer = Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync + 'static>;

fn file_layer_for(agent_name: &str) -> Option<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard)> {
    let path = mdflow_config::paths::agent_log_path(agent_name).ok()?;
    let dir = path.parent()?;
    std::fs::create_dir_all(dir).ok()?;
    let file_name = path.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .boxed();
    Some((layer, guard))
}

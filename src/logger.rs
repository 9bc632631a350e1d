use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const TIMESTAMP_FMT: &str = "%m%dT%H:%M:%S%.3f";

#[derive(Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FMT))
    }
}

/// Log to stdout and to `log_path`. Keep the returned guard alive until exit
/// or buffered file lines are lost.
pub fn init(
    log_path: impl AsRef<Path>,
    level: &str,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_path = log_path.as_ref();
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(log_path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_writer(std::io::stdout)
                .with_filter(EnvFilter::try_new(level)?),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(EnvFilter::try_new(level)?),
        )
        .try_init()?;

    Ok(guard)
}

/// Stdout-only variant for short-lived callers that don't keep a log file.
pub fn init_stdout(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_filter(EnvFilter::try_new(level)?),
        )
        .try_init()?;
    Ok(())
}

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber. When a log file is given, records go
/// through a non-blocking appender so the interactive screen stays clean;
/// otherwise they go to stderr. The returned guard must be held until exit
/// or buffered records are lost.
pub fn init_tracing(json_output: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rev_sim=debug,rev_core=debug"));

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file = path.file_name().map(Path::new).unwrap_or(path);
            let appender =
                tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            if json_output {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(writer))
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .init();
            }
            Some(guard)
        }
        None => {
            if json_output {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .init();
            }
            None
        }
    }
}

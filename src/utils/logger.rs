use snafu::{ResultExt, Snafu};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_FILTER: &str = "ratatosk=info,rubber=info";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not init log file: {}", source))]
    InitLog { source: std::io::Error },

    #[snafu(display("Could not redirect log records to tracing: {}", source))]
    LogTracer { source: log::SetLoggerError },

    #[snafu(display("Could not install tracing subscriber: {}", source))]
    Subscriber {
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}

/// Sends traces, as bunyan JSON records, to `path`.
///
/// If `path` is a directory, logs go to a daily rolling `ratatosk.log` file in
/// it, otherwise they are appended to the file at `path`. Traces are filtered
/// with `RUST_LOG`, or `ratatosk=info,rubber=info` when it is unset.
///
/// Records are written by a background thread: the returned guard must be
/// kept alive until the program exits, so that they are flushed.
pub fn logger_init<P: AsRef<Path>>(path: P) -> Result<WorkerGuard, Error> {
    LogTracer::init().context(LogTracerSnafu)?;
    let path = path.as_ref();
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_owned());

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();

    let (non_blocking, guard) = {
        if path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(path, "ratatosk.log");
            tracing_appender::non_blocking(file_appender)
        } else {
            tracing_appender::non_blocking(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .context(InitLogSnafu)?,
            )
        }
    };

    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking);
    let subscriber = Registry::default()
        .with(EnvFilter::new(&filter))
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);
    tracing::subscriber::set_global_default(subscriber).context(SubscriberSnafu)?;
    Ok(guard)
}

//! Startup logging, mirroring `ox-bin`'s `configure_logging`: a rotating
//! file appender plus an `EnvFilter` whose default level scales with `-v`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

pub fn init(verbosity: u8) -> WorkerGuard {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("docrw.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let file_appender = tracing_appender::rolling::never(log_dir, "docrw.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .try_init();
    guard
}

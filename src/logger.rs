// src/logger.rs
use std::{io, path::Path, sync::OnceLock};
use tracing_subscriber::{EnvFilter, fmt};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

/// Initialize logging once for the whole process.
/// - `path`: e.g., "logs/rookie.log"
/// - `filter`: e.g., "rookie=debug,rookie::moves::perft=trace"
///
/// Later calls are no-ops. Fails only if the log file cannot be opened.
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) -> io::Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }
    let path = path.as_ref();

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;

    INIT.get_or_init(|| {
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        // Keep the guard alive for the program lifetime
        let _ = GUARD.set(guard);

        // RUST_LOG wins over the caller's filter string
        let env_filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let subscriber = fmt()
            .with_env_filter(env_filter)
            .with_ansi(false) // plain text in files
            .with_target(true) // show module e.g. rookie::session
            .with_file(true)
            .with_line_number(true)
            .with_writer(non_blocking)
            .finish();

        // Ignore error if someone already set a global subscriber
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
    Ok(())
}

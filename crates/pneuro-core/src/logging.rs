//! Logging init: file under the XDG state dir, falling back to stderr.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,pneuro=debug"))
}

fn open_log_file() -> anyhow::Result<(fs::File, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pneuro")?;
    let log_dir = xdg_dirs.get_state_home().join("pneuro");
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("pneuro.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Initialize structured logging to `~/.local/state/pneuro/pneuro.log`, or to
/// stderr when the log dir is unwritable. Call once, early.
pub fn init_logging() {
    let writer = match open_log_file() {
        Ok((file, path)) => {
            let w = BoxMakeWriter::new(move || {
                file.try_clone()
                    .map(|f| Box::new(f) as Box<dyn io::Write + Send>)
                    .unwrap_or_else(|_| Box::new(io::stderr()))
            });
            Some((w, path))
        }
        Err(_) => None,
    };

    match writer {
        Some((writer, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            tracing::info!("pneuro logging initialized at {}", path.display());
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
        }
    }
}

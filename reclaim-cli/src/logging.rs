use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Env var holding the tracing filter directives
const FILTER_ENV: &str = "RECLAIM_LOG";

/// Default log location under the user's cache dir
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("reclaim").join("reclaim.log"))
}

/// Directory and file name of a log path; a bare name lands in the current dir
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir.to_path_buf(), PathBuf::from(file_name)))
}

/// Send tracing to a file. The terminal belongs to the UI.
///
/// The returned guard flushes the writer on drop and must outlive the app.
pub fn init_logger(log_file: Option<PathBuf>) -> Result<WorkerGuard> {
    let path = log_file
        .or_else(default_log_path)
        .ok_or_else(|| eyre!("no cache directory found, pass --log-file"))?;
    let (dir, file_name) = split_log_path(&path)?;
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter_layer =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log = %path.display(),
        "reclaim starting"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("logs/run/reclaim.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs/run"));
        assert_eq!(name, PathBuf::from("reclaim.log"));

        let (dir, name) = split_log_path(Path::new("reclaim.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("reclaim.log"));
    }

    #[test]
    fn test_split_rejects_bare_root() {
        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_default_path_is_named() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("reclaim/reclaim.log"));
        }
    }
}

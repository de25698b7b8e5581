use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Source of the OS lookups the target catalog resolves against
pub trait Environment: Send + Sync {
    /// Value of an environment variable; unset and empty both read as `None`
    fn var(&self, key: &str) -> Option<OsString>;

    /// Roots of every mounted volume (`C:\`, `D:\`, ...)
    fn volume_roots(&self) -> Vec<PathBuf>;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key).filter(|v| !v.is_empty())
    }

    #[cfg(windows)]
    fn volume_roots(&self) -> Vec<PathBuf> {
        (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|root| root.exists())
            .collect()
    }

    #[cfg(not(windows))]
    fn volume_roots(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

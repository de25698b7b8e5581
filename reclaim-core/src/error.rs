use std::path::PathBuf;
use thiserror::Error;

/// Why a pipeline request was refused. The message is shown to the user as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("A scan is already running, please wait for it to finish")]
    ScanInProgress,

    #[error("A cleanup is already running, please wait for it to finish")]
    CleanupInProgress,

    #[error("The previous scan has not been cleaned or discarded yet")]
    UnconsumedScan,

    #[error("Nothing has been scanned yet, run a scan first")]
    NotScanned,

    #[error("The last scan found nothing to clean")]
    NothingToClean,

    #[error("This confirmation belongs to an earlier scan")]
    StaleConfirmation,
}

#[derive(Error, Debug)]
pub enum ReclaimError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Service control failed for {service}: {reason}")]
    ServiceControl { service: String, reason: String },

    #[error("Emptying the trash failed: {0}")]
    Trash(String),

    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("The {0} stopped unexpectedly")]
    WorkerPanicked(&'static str),
}

pub type Result<T> = std::result::Result<T, ReclaimError>;

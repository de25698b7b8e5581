use std::time::Duration;

use crate::scanner::WalkConfig;
use crate::size::MIB;
use crate::targets::TargetPath;

/// Files above this size are reported individually while scanning
pub const NOTABLE_SCAN_BYTES: u64 = 5 * MIB;
/// Removed files above this size are reported individually
pub const NOTABLE_CLEAN_BYTES: u64 = 10 * MIB;

/// Scan progress is emitted every this many entries
pub const SCAN_PROGRESS_EVERY: u64 = 50;
/// Estimate totals are emitted every this many entries
pub const ESTIMATE_PROGRESS_EVERY: u64 = 100;
/// Cleanup progress is emitted every this many entries
pub const CLEAN_PROGRESS_EVERY: usize = 50;

/// Highest percentage reported before a scan completes
pub const SCAN_PROGRESS_CAP: u64 = 90;
/// Entry count at which the in-flight percentage reaches the cap
pub const SCAN_PROGRESS_SCALE: u64 = 1000;

/// OS update service that can hold files in the update cache
pub const UPDATE_SERVICE: &str = "wuauserv";
/// Pause after asking the service to stop
pub const SERVICE_SETTLE: Duration = Duration::from_secs(1);

/// Runtime configuration for a [`Pipeline`](crate::Pipeline)
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub walk: WalkConfig,
    /// Service to stop around deletion (None = leave services alone)
    pub service: Option<String>,
    pub service_settle: Duration,
    /// Empty the OS trash after deletion
    pub empty_trash: bool,
    /// Roots supplied by the user, appended after the catalog
    pub extra_roots: Vec<TargetPath>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            walk: WalkConfig::default(),
            service: Some(UPDATE_SERVICE.to_string()),
            service_settle: SERVICE_SETTLE,
            empty_trash: true,
            extra_roots: Vec::new(),
        }
    }
}

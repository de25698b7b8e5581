pub mod config;
pub mod disk;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod privilege;
pub mod remover;
pub mod scanner;
pub mod service;
pub mod session;
pub mod size;
pub mod targets;
pub mod trash;

pub use config::PipelineConfig;
pub use disk::{DiskInfo, DiskUsage, SystemDisk};
pub use error::{ReclaimError, Rejection, Result};
pub use events::{LogLine, LogTag, PipelineEvent, Totals};
pub use pipeline::{CleanupRequest, Pipeline, SessionSnapshot};
pub use privilege::is_elevated;
pub use remover::CleanupResult;
pub use scanner::{DepthWalker, Manifest, ScanEntry, WalkConfig};
pub use session::SessionState;
pub use size::{format_count, format_megabytes, format_size};
pub use targets::{Category, TargetLocator, TargetPath, resolve_root};

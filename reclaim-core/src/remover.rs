use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::config::{CLEAN_PROGRESS_EVERY, NOTABLE_CLEAN_BYTES};
use crate::events::{LogTag, Reporter, WorkerMessage};
use crate::scanner::{Manifest, ScanEntry};
use crate::service::ServiceCoordinator;
use crate::size::{format_count, format_megabytes, format_size};
use crate::trash::TrashStore;

/// Outcome of deleting one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed { bytes: u64 },
    Failed { path: PathBuf, reason: String },
}

/// Summary of one cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupResult {
    cleaned_count: u64,
    cleaned_bytes: u64,
    failed_count: u64,
}

impl CleanupResult {
    pub fn cleaned_count(&self) -> u64 {
        self.cleaned_count
    }

    pub fn cleaned_bytes(&self) -> u64 {
        self.cleaned_bytes
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count
    }
}

/// Accumulates removals until the batch is over
#[derive(Debug, Default)]
pub struct CleanupTally {
    result: CleanupResult,
}

impl CleanupTally {
    pub fn record(&mut self, removal: &Removal) {
        match removal {
            Removal::Removed { bytes } => {
                self.result.cleaned_count += 1;
                self.result.cleaned_bytes += bytes;
            }
            Removal::Failed { .. } => self.result.failed_count += 1,
        }
    }

    pub fn finish(self) -> CleanupResult {
        self.result
    }
}

/// Delete one file, clearing a read-only flag first.
/// Never fails the caller; problems come back as [`Removal::Failed`].
pub fn remove_entry(entry: &ScanEntry) -> Removal {
    match try_remove(&entry.path) {
        Ok(()) => Removal::Removed { bytes: entry.size },
        Err(e) => {
            debug!(path = %entry.path.display(), "remove failed: {}", e);
            Removal::Failed {
                path: entry.path.clone(),
                reason: e.to_string(),
            }
        }
    }
}

fn try_remove(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        return Err(io::Error::other("is a directory"));
    }

    // Symlink permissions belong to the target, leave them alone
    if !meta.file_type().is_symlink() && meta.permissions().readonly() {
        clear_readonly(path, meta.permissions())?;
    }

    fs::remove_file(path)
}

#[cfg(unix)]
fn clear_readonly(path: &Path, perms: fs::Permissions) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = perms;
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path, perms: fs::Permissions) -> io::Result<()> {
    let mut perms = perms;
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}

/// Deletes a manifest's entries, bracketed by service stop/start and
/// followed by emptying the trash.
#[derive(Default)]
pub struct Remover {
    services: Option<ServiceCoordinator>,
    trash: Option<Arc<dyn TrashStore>>,
}

impl Remover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, services: ServiceCoordinator) -> Self {
        self.services = Some(services);
        self
    }

    pub fn with_trash(mut self, trash: Arc<dyn TrashStore>) -> Self {
        self.trash = Some(trash);
        self
    }

    /// Clean in the background, reporting on an existing channel
    pub fn spawn(self, manifest: Manifest, tx: Sender<WorkerMessage>) -> JoinHandle<CleanupResult> {
        std::thread::spawn(move || {
            let reporter = Reporter::new(tx);
            let result = self.run(manifest, &reporter);
            reporter.send(WorkerMessage::CleanFinished);
            result
        })
    }

    /// Synchronous cleanup (runs in thread). Consumes the manifest.
    pub fn run(&self, manifest: Manifest, reporter: &Reporter) -> CleanupResult {
        if let Some(services) = &self.services {
            services.stop(reporter);
        }

        let total = manifest.len();
        reporter.log(
            LogTag::System,
            format!("Removing {} files...", format_count(total as u64)),
        );
        reporter.send(WorkerMessage::CleanProgress { processed: 0, total });

        let mut tally = CleanupTally::default();
        for (i, entry) in manifest.into_iter().enumerate() {
            let removal = remove_entry(&entry);
            if matches!(removal, Removal::Removed { .. }) && entry.size > NOTABLE_CLEAN_BYTES {
                reporter.log(
                    LogTag::Cleaned,
                    format!("{} ({})", entry.name, format_megabytes(entry.size)),
                );
            }
            tally.record(&removal);

            let processed = i + 1;
            if processed % CLEAN_PROGRESS_EVERY == 0 || processed == total {
                reporter.send(WorkerMessage::CleanProgress { processed, total });
            }
        }
        let result = tally.finish();

        reporter.log(
            LogTag::Done,
            format!(
                "Cleanup complete, removed {} files",
                format_count(result.cleaned_count())
            ),
        );
        reporter.log(
            LogTag::Stats,
            format!("Space recovered: {}", format_size(result.cleaned_bytes())),
        );
        if result.failed_count() > 0 {
            reporter.log(
                LogTag::Warning,
                format!(
                    "{} files could not be removed (in use or access denied)",
                    format_count(result.failed_count())
                ),
            );
        }

        if let Some(services) = &self.services {
            services.start(reporter);
        }

        if let Some(trash) = &self.trash {
            match trash.empty_all() {
                Ok(()) => reporter.log(LogTag::Trash, "Emptied the trash on all volumes"),
                Err(e) => {
                    warn!("emptying trash failed: {}", e);
                    reporter.log(LogTag::Warning, "Could not empty the trash");
                }
            }
        }

        result
    }
}

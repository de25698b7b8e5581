use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use super::manifest::Manifest;
use super::progress::scan_progress;
use super::walker::{DepthWalker, WalkConfig};
use crate::config::{NOTABLE_SCAN_BYTES, SCAN_PROGRESS_EVERY};
use crate::events::{LogTag, Reporter, WorkerMessage};
use crate::size::{format_count, format_megabytes, format_size};
use crate::targets::TargetPath;

/// Authoritative scan: walks every target and builds a fresh [`Manifest`]
pub struct Scanner {
    walker: DepthWalker,
}

impl Scanner {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            walker: DepthWalker::new(config),
        }
    }

    /// Scan in the background.
    /// Returns a receiver for progress updates and the handle yielding the manifest.
    pub fn scan(self, targets: Vec<TargetPath>) -> (Receiver<WorkerMessage>, JoinHandle<Manifest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = self.spawn(targets, tx);
        (rx, handle)
    }

    /// Scan in the background, reporting on an existing channel
    pub fn spawn(self, targets: Vec<TargetPath>, tx: Sender<WorkerMessage>) -> JoinHandle<Manifest> {
        std::thread::spawn(move || {
            let reporter = Reporter::new(tx);
            let manifest = self.run(&targets, &reporter);
            reporter.send(WorkerMessage::ScanFinished);
            manifest
        })
    }

    /// Synchronous scan (runs in thread)
    pub fn run(&self, targets: &[TargetPath], reporter: &Reporter) -> Manifest {
        let mut manifest = Manifest::new();
        reporter.send(WorkerMessage::ScanProgress(0));
        reporter.log(
            LogTag::Scan,
            format!("Found {} reclaimable locations", targets.len()),
        );

        for target in targets {
            reporter.log(
                LogTag::Scan,
                format!("Scanning {} ({})", target.root.display(), target.category),
            );

            let mut walk = match self.walker.walk(&target.root, target.max_depth()) {
                Ok(w) => w,
                Err(e) => {
                    debug!(root = %target.root.display(), "root unreadable: {}", e);
                    reporter.log(
                        LogTag::Warning,
                        format!("Cannot access {}", target.root.display()),
                    );
                    continue;
                }
            };

            for entry in walk.by_ref() {
                if entry.size > NOTABLE_SCAN_BYTES {
                    reporter.log(
                        LogTag::Found,
                        format!("{} ({})", entry.name, format_megabytes(entry.size)),
                    );
                }

                manifest.push(entry);

                let count = manifest.len() as u64;
                if count % SCAN_PROGRESS_EVERY == 0 {
                    reporter.send(WorkerMessage::ScanProgress(scan_progress(count)));
                }
            }

            let stats = walk.stats();
            debug!(
                root = %target.root.display(),
                files = stats.yielded,
                skipped = stats.errors,
                "root scanned"
            );
        }

        reporter.send(WorkerMessage::ScanProgress(100));

        let totals = manifest.totals();
        reporter.log(
            LogTag::Done,
            format!(
                "Scan complete, found {} reclaimable files",
                format_count(totals.count)
            ),
        );
        reporter.log(
            LogTag::Stats,
            format!("Total reclaimable size: {}", format_size(totals.bytes)),
        );

        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{LogLine, Totals};
    use crate::size::MIB;
    use crate::targets::Category;
    use std::fs;
    use tempfile::TempDir;

    fn serial() -> Scanner {
        Scanner::new(WalkConfig { num_threads: 1 })
    }

    fn drain(rx: &Receiver<WorkerMessage>) -> (Vec<u8>, Vec<LogLine>) {
        let mut progress = Vec::new();
        let mut lines = Vec::new();
        for msg in rx.try_iter() {
            match msg {
                WorkerMessage::ScanProgress(p) => progress.push(p),
                WorkerMessage::Log(line) => lines.push(line),
                _ => {}
            }
        }
        (progress, lines)
    }

    #[test]
    fn test_scan_layered_root_with_depth_two() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f0"), vec![0u8; MIB as usize]).unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/f1"), vec![0u8; 2 * MIB as usize]).unwrap();
        fs::write(temp.path().join("a/b/f2"), vec![0u8; 3 * MIB as usize]).unwrap();

        let (reporter, rx) = Reporter::channel();
        let targets = [TargetPath::new(temp.path(), Category::TrashStore)];
        let manifest = serial().run(&targets, &reporter);

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.totals(), Totals { count: 2, bytes: 3 * MIB });

        let (progress, _) = drain(&rx);
        assert_eq!(progress.first(), Some(&0));
        assert_eq!(progress.last(), Some(&100));
    }

    #[test]
    fn test_progress_cadence_and_cap() {
        let temp = TempDir::new().unwrap();
        for i in 0..2500 {
            fs::write(temp.path().join(format!("f{:04}", i)), b"").unwrap();
        }

        let (reporter, rx) = Reporter::channel();
        let targets = [TargetPath::new(temp.path(), Category::UserTemp)];
        let manifest = serial().run(&targets, &reporter);
        assert_eq!(manifest.len(), 2500);

        let (progress, _) = drain(&rx);
        // initial 0, one update per 50 entries, final 100
        assert_eq!(progress.len(), 1 + 2500 / 50 + 1);
        assert_eq!(progress[1000 / 50], 90);
        assert!(progress[1..progress.len() - 1].iter().all(|&p| p <= 90));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*progress.last().unwrap(), 100);
    }

    #[test]
    fn test_large_files_are_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.bin"), vec![0u8; 6 * MIB as usize]).unwrap();
        fs::write(temp.path().join("small.bin"), vec![0u8; 1024]).unwrap();

        let (reporter, rx) = Reporter::channel();
        let targets = [TargetPath::new(temp.path(), Category::UserDownloads)];
        serial().run(&targets, &reporter);

        let (_, lines) = drain(&rx);
        let found: Vec<&LogLine> = lines.iter().filter(|l| l.tag == LogTag::Found).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "big.bin (6.00 MB)");
    }

    #[test]
    fn test_unreadable_root_warns_and_continues() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep"), b"data").unwrap();

        let (reporter, rx) = Reporter::channel();
        let targets = [
            TargetPath::new(temp.path().join("vanished"), Category::UserTemp),
            TargetPath::new(temp.path(), Category::UserTemp),
        ];
        let manifest = serial().run(&targets, &reporter);
        assert_eq!(manifest.len(), 1);

        let (_, lines) = drain(&rx);
        assert!(lines
            .iter()
            .any(|l| l.tag == LogTag::Warning && l.text.contains("vanished")));
    }

    #[test]
    fn test_background_scan_joins_with_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one"), b"1").unwrap();

        let (rx, handle) =
            serial().scan(vec![TargetPath::new(temp.path(), Category::UserTemp)]);
        let finished = rx
            .iter()
            .any(|msg| matches!(msg, WorkerMessage::ScanFinished));
        assert!(finished);

        let manifest = handle.join().unwrap();
        assert_eq!(manifest.len(), 1);
    }
}

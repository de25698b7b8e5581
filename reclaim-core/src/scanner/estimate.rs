use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use super::walker::{DepthWalker, WalkConfig};
use crate::config::ESTIMATE_PROGRESS_EVERY;
use crate::events::{LogTag, Reporter, Totals, WorkerMessage};
use crate::size::{format_count, format_size};
use crate::targets::TargetPath;

/// Speculative size estimate, started once in the background.
///
/// Only ever produces advisory totals; it has no access to the manifest or
/// the session, and nothing waits for it.
pub struct Estimator {
    walker: DepthWalker,
}

impl Estimator {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            walker: DepthWalker::new(config),
        }
    }

    pub fn spawn(self, targets: Vec<TargetPath>, tx: Sender<WorkerMessage>) -> JoinHandle<Totals> {
        std::thread::spawn(move || {
            let reporter = Reporter::new(tx);
            let totals = self.run(&targets, &reporter);
            reporter.send(WorkerMessage::EstimateFinished(totals));
            totals
        })
    }

    pub fn run(&self, targets: &[TargetPath], reporter: &Reporter) -> Totals {
        reporter.log(LogTag::Background, "Estimating reclaimable space...");

        let mut totals = Totals::default();
        for target in targets {
            let Ok(walk) = self.walker.walk(&target.root, target.max_depth()) else {
                continue;
            };
            for entry in walk {
                totals.add(entry.size);
                if totals.count % ESTIMATE_PROGRESS_EVERY == 0 {
                    reporter.send(WorkerMessage::Estimate(totals));
                }
            }
        }

        reporter.log(
            LogTag::Done,
            format!(
                "Estimated about {} temporary files ({})",
                format_count(totals.count),
                format_size(totals.bytes)
            ),
        );
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use crate::targets::Category;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_estimate_matches_scan_totals() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("x/y/z")).unwrap();
        for (i, dir) in ["", "x", "x/y", "x/y/z"].iter().enumerate() {
            fs::write(temp.path().join(dir).join("file"), vec![0u8; 100 * (i + 1)]).unwrap();
        }
        let targets = vec![
            TargetPath::new(temp.path(), Category::BrowserCache),
            TargetPath::new(temp.path().join("x"), Category::Custom(1)),
        ];
        let config = WalkConfig { num_threads: 1 };

        let (reporter, _rx) = Reporter::channel();
        let estimate = Estimator::new(config.clone()).run(&targets, &reporter);
        let manifest = Scanner::new(config).run(&targets, &reporter);

        assert_eq!(estimate, manifest.totals());
        // depth 3 sees three files, depth 1 under x sees one
        assert_eq!(estimate.count, 4);
    }

    #[test]
    fn test_estimate_cadence() {
        let temp = TempDir::new().unwrap();
        for i in 0..250 {
            fs::write(temp.path().join(format!("{}", i)), b"ab").unwrap();
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = Estimator::new(WalkConfig { num_threads: 1 })
            .spawn(vec![TargetPath::new(temp.path(), Category::UserTemp)], tx);
        let totals = handle.join().unwrap();
        assert_eq!(totals, Totals { count: 250, bytes: 500 });

        let updates: Vec<Totals> = rx
            .try_iter()
            .filter_map(|m| match m {
                WorkerMessage::Estimate(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(updates.iter().map(|t| t.count).collect::<Vec<_>>(), vec![100, 200]);
    }
}

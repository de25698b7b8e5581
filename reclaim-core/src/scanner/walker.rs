use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use tracing::debug;

type Entries = Box<dyn Iterator<Item = Result<jwalk::DirEntry<((), ())>, jwalk::Error>>>;

/// Walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Number of parallel threads (0 = auto, 1 = serial)
    pub num_threads: usize,
}

/// One file found by the walker. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub size: u64,
    pub name: String,
}

/// Counters for a single walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Entries handed out
    pub yielded: u64,
    /// Entries skipped because listing or stat failed
    pub errors: u64,
}

/// Depth-bounded traversal shared by the estimator and the scanner
#[derive(Debug, Clone, Default)]
pub struct DepthWalker {
    config: WalkConfig,
}

impl DepthWalker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Lazily walk `root`, yielding files no deeper than `max_depth`.
    ///
    /// The root is depth 0 and its children depth 1. Directories at
    /// `max_depth` are never read, so with `max_depth = 2` the files in the
    /// root and in its immediate subdirectories are yielded. A root that is
    /// itself a file yields just that file.
    ///
    /// Fails only when the root itself cannot be inspected; errors below the
    /// root skip the offending entry and are counted in [`WalkStats`].
    pub fn walk(&self, root: &Path, max_depth: usize) -> io::Result<Walk> {
        let root_meta = std::fs::metadata(root)?;
        if !root_meta.is_dir() {
            return Ok(Walk {
                root: root.to_path_buf(),
                source: Source::Single(Some(ScanEntry {
                    path: root.to_path_buf(),
                    size: entry_size(&root_meta),
                    name: display_name(root),
                })),
                stats: WalkStats::default(),
            });
        }

        // Surface an unreadable root instead of an empty walk
        std::fs::read_dir(root)?;

        let walker = WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .max_depth(max_depth);

        let walker = match self.config.num_threads {
            0 => walker,
            1 => walker.parallelism(Parallelism::Serial),
            n => walker.parallelism(Parallelism::RayonNewPool(n)),
        };

        Ok(Walk {
            root: root.to_path_buf(),
            source: Source::Tree(Box::new(walker.into_iter())),
            stats: WalkStats::default(),
        })
    }
}

enum Source {
    Single(Option<ScanEntry>),
    Tree(Entries),
}

/// Lazy sequence of [`ScanEntry`] values for one root
pub struct Walk {
    root: PathBuf,
    source: Source,
    stats: WalkStats,
}

impl Walk {
    pub fn stats(&self) -> WalkStats {
        self.stats
    }
}

impl Iterator for Walk {
    type Item = ScanEntry;

    fn next(&mut self) -> Option<ScanEntry> {
        let entries = match &mut self.source {
            Source::Single(file) => {
                let entry = file.take()?;
                self.stats.yielded += 1;
                return Some(entry);
            }
            Source::Tree(entries) => entries,
        };

        loop {
            let entry = match entries.next()? {
                Ok(e) => e,
                Err(e) => {
                    skip(&mut self.stats, &self.root, "read", &e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                // jwalk parks a failed listing on the directory entry itself
                if let Some(e) = &entry.read_children_error {
                    skip(&mut self.stats, &self.root, "read", e);
                }
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    skip(&mut self.stats, &self.root, "stat", &e);
                    continue;
                }
            };

            let path = entry.path();
            let name = display_name(&path);

            self.stats.yielded += 1;
            return Some(ScanEntry {
                size: entry_size(&metadata),
                path,
                name,
            });
        }
    }
}

fn skip(stats: &mut WalkStats, root: &Path, what: &str, error: &dyn std::fmt::Display) {
    stats.errors += 1;
    debug!(root = %root.display(), "skipping entry ({}): {}", what, error);
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Logical size of an entry; symlinks report the link itself
fn entry_size(metadata: &Metadata) -> u64 {
    metadata.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn serial() -> DepthWalker {
        DepthWalker::new(WalkConfig { num_threads: 1 })
    }

    /// root/f0 (1000 B), root/a/f1 (2000 B), root/a/b/f2 (3000 B)
    fn layered_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f0"), vec![0u8; 1000]).unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/f1"), vec![0u8; 2000]).unwrap();
        fs::write(temp.path().join("a/b/f2"), vec![0u8; 3000]).unwrap();
        temp
    }

    fn depth_below(root: &Path, path: &Path) -> usize {
        path.strip_prefix(root).unwrap().components().count()
    }

    #[test]
    fn test_depth_two_excludes_third_level() {
        let temp = layered_tree();
        let entries: Vec<ScanEntry> = serial().walk(temp.path(), 2).unwrap().collect();

        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["f0", "f1"]);
        assert_eq!(entries.iter().map(|e| e.size).sum::<u64>(), 3000);
    }

    #[test]
    fn test_depth_one_is_single_level() {
        let temp = layered_tree();
        let entries: Vec<ScanEntry> = serial().walk(temp.path(), 1).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, temp.path().join("f0"));
    }

    #[test]
    fn test_no_entry_exceeds_limit() {
        let temp = layered_tree();
        fs::create_dir_all(temp.path().join("a/b/c/d")).unwrap();
        fs::write(temp.path().join("a/b/c/d/deep"), b"x").unwrap();

        for limit in 1..=5 {
            let walk = serial().walk(temp.path(), limit).unwrap();
            for entry in walk {
                assert!(depth_below(temp.path(), &entry.path) <= limit);
            }
        }

        let all: Vec<ScanEntry> = serial().walk(temp.path(), 5).unwrap().collect();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_directories_are_not_yielded() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("empty/nested")).unwrap();
        let walk = serial().walk(temp.path(), 3).unwrap();
        assert_eq!(walk.count(), 0);
    }

    #[test]
    fn test_file_root_yields_itself() {
        let temp = TempDir::new().unwrap();
        let dump = temp.path().join("MEMORY.DMP");
        fs::write(&dump, vec![1u8; 4096]).unwrap();

        let entries: Vec<ScanEntry> = serial().walk(&dump, 1).unwrap().collect();
        assert_eq!(
            entries,
            vec![ScanEntry {
                path: dump,
                size: 4096,
                name: "MEMORY.DMP".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(serial().walk(&temp.path().join("gone"), 1).is_err());
    }

    #[test]
    fn test_stats_count_yielded_entries() {
        let temp = layered_tree();
        let mut walk = serial().walk(temp.path(), 3).unwrap();
        let count = walk.by_ref().count();
        assert_eq!(count, 3);
        assert_eq!(walk.stats().yielded, 3);
        assert_eq!(walk.stats().errors, 0);
    }

    #[test]
    fn test_parallel_walk_finds_same_files() {
        let temp = layered_tree();
        let walker = DepthWalker::new(WalkConfig { num_threads: 2 });
        let mut sizes: Vec<u64> = walker
            .walk(temp.path(), 3)
            .unwrap()
            .map(|e| e.size)
            .collect();
        sizes.sort();
        assert_eq!(sizes, vec![1000, 2000, 3000]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdir_is_skipped_and_counted() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.log"), b"a").unwrap();
        fs::create_dir(temp.path().join("open")).unwrap();
        fs::write(temp.path().join("open/b.log"), b"bb").unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.log"), b"ccc").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a superuser
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut walk = serial().walk(temp.path(), 3).unwrap();
        let mut names: Vec<String> = walk.by_ref().map(|e| e.name).collect();
        names.sort();
        let stats = walk.stats();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(names, vec!["a.log", "b.log"]);
        assert!(stats.errors >= 1);
        assert_eq!(stats.yielded, 2);
    }
}

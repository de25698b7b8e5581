mod catalog;
mod env;

pub use catalog::{CATALOG, TargetSpec};
pub use env::{Environment, SystemEnvironment};

#[cfg(test)]
pub(crate) use env::fake::FakeEnvironment;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ReclaimError, Result};

/// Classification of a target root; decides how deep it is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    UpdateCache,
    PriorInstall,
    CrashDump,
    SystemLogs,
    InstallCache,
    SystemTemp,
    DeliveryOptimization,
    BrowserCache,
    BrowserProfile,
    TrashStore,
    UserDownloads,
    UserTemp,
    /// Root supplied on the command line, walked to the given depth
    Custom(usize),
}

impl Category {
    /// Walk depth limit, see `DepthWalker::walk`
    pub fn max_depth(self) -> usize {
        match self {
            Category::BrowserCache | Category::BrowserProfile => 3,
            Category::TrashStore | Category::UpdateCache | Category::InstallCache => 2,
            Category::Custom(depth) => depth,
            _ => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::UpdateCache => "update cache",
            Category::PriorInstall => "previous OS install",
            Category::CrashDump => "crash dumps",
            Category::SystemLogs => "system logs",
            Category::InstallCache => "install cache",
            Category::SystemTemp => "system temp",
            Category::DeliveryOptimization => "delivery optimization cache",
            Category::BrowserCache => "browser cache",
            Category::BrowserProfile => "browser profiles",
            Category::TrashStore => "recycle bin",
            Category::UserDownloads => "downloads",
            Category::UserTemp => "user temp",
            Category::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved, existing root together with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    pub root: PathBuf,
    pub category: Category,
}

impl TargetPath {
    pub fn new(root: impl Into<PathBuf>, category: Category) -> Self {
        Self {
            root: root.into(),
            category,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.category.max_depth()
    }
}

/// Canonical form of a user-supplied root, which must exist
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let path = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    if !path.exists() {
        return Err(ReclaimError::PathNotFound(path));
    }
    Ok(path)
}

/// Resolves the catalog against an environment
pub struct TargetLocator {
    env: Box<dyn Environment>,
    catalog: &'static [TargetSpec],
    extra: Vec<TargetPath>,
}

impl TargetLocator {
    pub fn new(env: impl Environment + 'static) -> Self {
        Self {
            env: Box::new(env),
            catalog: CATALOG,
            extra: Vec::new(),
        }
    }

    /// Locator over the real process environment
    pub fn system() -> Self {
        Self::new(SystemEnvironment)
    }

    /// Append user-supplied roots after the catalog
    pub fn with_extra_roots(mut self, roots: impl IntoIterator<Item = TargetPath>) -> Self {
        self.extra.extend(roots);
        self
    }

    /// Resolve every catalog entry, keeping existing paths in catalog order.
    /// A path resolved twice is kept once, under its first category.
    pub fn locate(&self) -> Vec<TargetPath> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        let resolved = self
            .catalog
            .iter()
            .flat_map(|spec| {
                (spec.resolve)(self.env.as_ref())
                    .into_iter()
                    .map(|root| TargetPath::new(root, spec.category))
            })
            .chain(self.extra.iter().cloned());

        for target in resolved {
            if !self.env.exists(&target.root) {
                debug!(root = %target.root.display(), "skipping missing root");
                continue;
            }
            if seen.insert(target.root.clone()) {
                targets.push(target);
            }
        }

        targets
    }
}

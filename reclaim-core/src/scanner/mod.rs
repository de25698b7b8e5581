mod estimate;
mod manifest;
mod progress;
mod scan;
mod walker;

pub use estimate::Estimator;
pub use manifest::Manifest;
pub use progress::scan_progress;
pub use scan::Scanner;
pub use walker::{DepthWalker, ScanEntry, Walk, WalkConfig, WalkStats};

// Run with: cargo run -p reclaim-core --example debug_walk -- /path/to/walk [depth]

use reclaim_core::{DepthWalker, WalkConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let depth: usize = args.next().and_then(|d| d.parse().ok()).unwrap_or(1);

    println!("Walking: {:?} (max depth {})", path, depth);

    let walker = DepthWalker::new(WalkConfig::default());
    let start = Instant::now();
    let mut walk = match walker.walk(&path, depth) {
        Ok(w) => w,
        Err(e) => {
            println!("ERROR: {}", e);
            return;
        }
    };

    // Files per depth below the root
    let mut per_depth: BTreeMap<usize, (u64, u64)> = BTreeMap::new();
    for entry in walk.by_ref() {
        let level = entry
            .path
            .strip_prefix(&path)
            .map(|rel| rel.components().count())
            .unwrap_or(0);
        let slot = per_depth.entry(level).or_default();
        slot.0 += 1;
        slot.1 += entry.size;
        println!("{:>12}  d{}  {}", entry.size, level, entry.path.display());
    }

    println!();
    for (level, (files, bytes)) in &per_depth {
        println!(
            "depth {}: {} files, {}",
            level,
            files,
            reclaim_core::format_size(*bytes)
        );
    }

    let stats = walk.stats();
    println!(
        "\n[{:>6.1}s] yielded={} errors={}",
        start.elapsed().as_secs_f64(),
        stats.yielded,
        stats.errors
    );
}

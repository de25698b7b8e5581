use crate::config::{SCAN_PROGRESS_CAP, SCAN_PROGRESS_SCALE};

/// Percentage shown while a scan is still walking.
///
/// This tracks entries seen, not work remaining: it climbs to the cap at
/// `SCAN_PROGRESS_SCALE` entries and holds there until the scan completes
/// and reports 100.
pub fn scan_progress(entries: u64) -> u8 {
    let scaled = entries
        .saturating_mul(SCAN_PROGRESS_CAP)
        .saturating_add(SCAN_PROGRESS_SCALE / 2)
        / SCAN_PROGRESS_SCALE;
    scaled.min(SCAN_PROGRESS_CAP) as u8
}

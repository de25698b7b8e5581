use super::walker::ScanEntry;
use crate::events::Totals;

/// Entries produced by one scan, consumed by one cleanup.
///
/// Totals are kept in step with the entries on every push, so they always
/// describe exactly what the manifest holds.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ScanEntry>,
    totals: Totals,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScanEntry) {
        self.totals.add(entry.size);
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }
}

impl IntoIterator for Manifest {
    type Item = ScanEntry;
    type IntoIter = std::vec::IntoIter<ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_track_entries() {
        let mut manifest = Manifest::new();
        assert!(manifest.is_empty());

        for (i, size) in [10u64, 0, 32].into_iter().enumerate() {
            manifest.push(ScanEntry {
                path: format!("/tmp/{}", i).into(),
                size,
                name: i.to_string(),
            });
        }

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.totals(), Totals { count: 3, bytes: 42 });
        assert_eq!(
            manifest.entries().iter().map(|e| e.size).sum::<u64>(),
            manifest.totals().bytes
        );
    }
}

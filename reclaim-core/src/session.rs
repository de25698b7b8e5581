use crate::error::Rejection;
use crate::events::Totals;

/// Where a session is in its scan/clean cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Scanning,
    Scanned,
    Cleaning,
}

/// Authoritative session state.
///
/// Only the authoritative scan and the remover move this forward. The
/// background estimate never touches it.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    state: SessionState,
    progress: u8,
    totals: Totals,
    generation: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Totals of the last completed scan (zero until one completes)
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Bumped on every scan start, used to match confirmations to scans
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn begin_scan(&mut self) -> Result<u64, Rejection> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Scanning;
                self.progress = 0;
                self.totals = Totals::default();
                self.generation += 1;
                Ok(self.generation)
            }
            SessionState::Scanning => Err(Rejection::ScanInProgress),
            SessionState::Cleaning => Err(Rejection::CleanupInProgress),
            SessionState::Scanned => Err(Rejection::UnconsumedScan),
        }
    }

    /// Progress never moves backwards within a scan
    pub fn set_progress(&mut self, percent: u8) {
        if self.state == SessionState::Scanning {
            self.progress = self.progress.max(percent.min(100));
        }
    }

    pub fn finish_scan(&mut self, totals: Totals) {
        if self.state == SessionState::Scanning {
            self.state = SessionState::Scanned;
            self.progress = 100;
            self.totals = totals;
        }
    }

    pub fn can_begin_cleanup(&self) -> Result<(), Rejection> {
        match self.state {
            SessionState::Scanned if self.totals.count > 0 => Ok(()),
            SessionState::Scanned => Err(Rejection::NothingToClean),
            SessionState::Idle => Err(Rejection::NotScanned),
            SessionState::Scanning => Err(Rejection::ScanInProgress),
            SessionState::Cleaning => Err(Rejection::CleanupInProgress),
        }
    }

    pub fn begin_cleanup(&mut self) -> Result<(), Rejection> {
        self.can_begin_cleanup()?;
        self.state = SessionState::Cleaning;
        Ok(())
    }

    /// Back to idle; the cleaned scan's totals are gone
    pub fn finish_cleanup(&mut self) {
        if self.state == SessionState::Cleaning {
            self.reset();
        }
    }

    /// Drop a finished scan without cleaning it
    pub fn discard(&mut self) -> Result<(), Rejection> {
        match self.state {
            SessionState::Scanned => {
                self.reset();
                Ok(())
            }
            SessionState::Idle => Err(Rejection::NotScanned),
            SessionState::Scanning => Err(Rejection::ScanInProgress),
            SessionState::Cleaning => Err(Rejection::CleanupInProgress),
        }
    }

    /// A worker died; return to idle whatever the state
    pub(crate) fn abandon(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.progress = 0;
        self.totals = Totals::default();
    }
}

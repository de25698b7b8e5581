use std::collections::VecDeque;

use reclaim_core::{
    CleanupRequest, LogLine, LogTag, Pipeline, PipelineEvent, SessionSnapshot, SessionState,
};

/// Lines kept in the log pane
const LOG_CAPACITY: usize = 500;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Nothing running, no scan to clean
    Idle,
    /// Authoritative scan running
    Scanning,
    /// Scan finished, waiting for the user
    Scanned,
    /// Showing cleanup confirmation dialog
    ConfirmCleanup,
    /// Removal in progress
    Cleaning,
    /// Showing help overlay
    Help,
}

/// Application state. The only owner of everything the display shows.
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    pipeline: Pipeline,
    /// Tagged lines for the log pane, oldest first
    pub log: VecDeque<LogLine>,
    /// Lines scrolled back from the newest
    pub log_scroll: usize,
    /// Latest scan percentage
    pub progress: u8,
    /// (processed, total) while cleaning
    pub clean_progress: Option<(usize, usize)>,
    /// Confirmation waiting for y/n
    pending_cleanup: Option<CleanupRequest>,
    /// Running with administrative rights
    pub elevated: bool,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, elevated: bool) -> Self {
        let mut state = Self {
            mode: AppMode::Idle,
            pipeline,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            log_scroll: 0,
            progress: 0,
            clean_progress: None,
            pending_cleanup: None,
            elevated,
            should_quit: false,
            spinner_frame: 0,
        };

        state.push_log(LogTag::System, "Ready. Press s to scan, ? for help");
        if !elevated {
            state.push_log(
                LogTag::System,
                "Not running as administrator, some locations will be skipped",
            );
        }
        state
    }

    /// Kick off the background estimate
    pub fn start_estimate(&mut self) {
        self.pipeline.start_estimate();
    }

    /// Apply everything the workers have reported since the last call
    pub fn update(&mut self) {
        for event in self.pipeline.poll() {
            self.apply_event(event);
        }
        if !matches!(self.mode, AppMode::Help | AppMode::ConfirmCleanup) {
            self.mode = self.base_mode();
        }
    }

    fn apply_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Log(line) => self.push_line(line),
            PipelineEvent::ScanProgress(percent) => self.progress = percent,
            PipelineEvent::ScanCompleted(_) => self.progress = 100,
            PipelineEvent::CleanProgress { processed, total } => {
                self.clean_progress = Some((processed, total));
            }
            PipelineEvent::CleanupCompleted(_) => {
                self.clean_progress = None;
                self.progress = 0;
            }
            PipelineEvent::Estimate(_) => {}
        }
    }

    /// Mode implied by the session alone
    fn base_mode(&self) -> AppMode {
        match self.pipeline.session().state() {
            SessionState::Idle => AppMode::Idle,
            SessionState::Scanning => AppMode::Scanning,
            SessionState::Scanned => AppMode::Scanned,
            SessionState::Cleaning => AppMode::Cleaning,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.pipeline.snapshot()
    }

    pub fn is_estimating(&self) -> bool {
        self.pipeline.is_estimating()
    }

    /// Start a scan, dropping a finished one that was never cleaned
    pub fn request_scan(&mut self) {
        if self.pipeline.session().state() == SessionState::Scanned {
            if let Err(rejection) = self.pipeline.discard_scan() {
                self.push_log(LogTag::Warning, rejection.to_string());
                return;
            }
        }
        match self.pipeline.request_scan() {
            Ok(()) => {
                self.progress = 0;
                self.mode = AppMode::Scanning;
            }
            Err(rejection) => self.push_log(LogTag::Warning, rejection.to_string()),
        }
    }

    /// First half of the confirmation gate
    pub fn request_cleanup(&mut self) {
        match self.pipeline.prepare_cleanup() {
            Ok(request) => {
                self.pending_cleanup = Some(request);
                self.mode = AppMode::ConfirmCleanup;
            }
            Err(rejection) => self.push_log(LogTag::Warning, rejection.to_string()),
        }
    }

    /// What the confirmation dialog is asking about
    pub fn pending_cleanup(&self) -> Option<&CleanupRequest> {
        self.pending_cleanup.as_ref()
    }

    pub fn confirm_cleanup(&mut self) {
        if let Some(request) = self.pending_cleanup.take()
            && let Err(rejection) = self.pipeline.confirm_cleanup(request)
        {
            self.push_log(LogTag::Warning, rejection.to_string());
        }
        self.mode = self.base_mode();
    }

    pub fn cancel_cleanup(&mut self) {
        if self.pending_cleanup.take().is_some() {
            self.push_log(LogTag::System, "Cleanup cancelled");
        }
        self.mode = self.base_mode();
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    /// Hide help overlay
    pub fn hide_help(&mut self) {
        self.mode = if self.pending_cleanup.is_some() {
            AppMode::ConfirmCleanup
        } else {
            self.base_mode()
        };
    }

    pub fn scroll_up(&mut self) {
        self.log_scroll = (self.log_scroll + 1).min(self.log.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    /// Request quit. Refused while files are being removed.
    pub fn quit(&mut self) {
        if self.pipeline.session().state() == SessionState::Cleaning {
            self.push_log(
                LogTag::Warning,
                "Cleanup is running, wait for it to finish before quitting",
            );
        } else {
            self.should_quit = true;
        }
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn push_log(&mut self, tag: LogTag, text: impl Into<String>) {
        self.push_line(LogLine::new(tag, text));
    }

    fn push_line(&mut self, line: LogLine) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
        // Keep the view anchored while scrolled back
        if self.log_scroll > 0 {
            self.log_scroll = (self.log_scroll + 1).min(self.log.len().saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_core::service::ServiceControl;
    use reclaim_core::{DiskInfo, DiskUsage};
    use reclaim_core::targets::Environment;
    use reclaim_core::trash::TrashStore;
    use reclaim_core::{Category, PipelineConfig, TargetLocator, TargetPath, WalkConfig};
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct NoEnvironment;

    impl Environment for NoEnvironment {
        fn var(&self, _key: &str) -> Option<OsString> {
            None
        }

        fn volume_roots(&self) -> Vec<PathBuf> {
            Vec::new()
        }
    }

    struct Noop;

    impl ServiceControl for Noop {
        fn stop(&self, _service: &str) -> reclaim_core::Result<()> {
            Ok(())
        }

        fn start(&self, _service: &str) -> reclaim_core::Result<()> {
            Ok(())
        }
    }

    impl TrashStore for Noop {
        fn empty_all(&self) -> reclaim_core::Result<()> {
            Ok(())
        }
    }

    impl DiskInfo for Noop {
        fn usage(&self) -> reclaim_core::Result<DiskUsage> {
            Ok(DiskUsage {
                total: 1 << 30,
                free: 1 << 29,
            })
        }
    }

    fn state_for(root: &Path) -> AppState {
        let config = PipelineConfig {
            walk: WalkConfig { num_threads: 1 },
            service: None,
            empty_trash: false,
            extra_roots: vec![TargetPath::new(root, Category::Custom(1))],
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(
            config,
            TargetLocator::new(NoEnvironment),
            Arc::new(Noop),
            Arc::new(Noop),
            Arc::new(Noop),
        );
        AppState::new(pipeline, true)
    }

    fn wait_for_mode(state: &mut AppState, mode: AppMode) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            state.update();
            if state.mode == mode {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("never reached {:?}", mode);
    }

    fn warnings(state: &AppState) -> usize {
        state.log.iter().filter(|l| l.tag == LogTag::Warning).count()
    }

    #[test]
    fn test_scan_confirm_clean() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("old.tmp"), b"abc").unwrap();
        let mut state = state_for(temp.path());

        state.request_scan();
        assert_eq!(state.mode, AppMode::Scanning);
        wait_for_mode(&mut state, AppMode::Scanned);
        assert_eq!(state.progress, 100);

        state.request_cleanup();
        assert_eq!(state.mode, AppMode::ConfirmCleanup);
        assert_eq!(state.pending_cleanup().map(|r| r.count), Some(1));

        state.confirm_cleanup();
        wait_for_mode(&mut state, AppMode::Idle);

        assert!(!temp.path().join("old.tmp").exists());
        assert_eq!(
            state.snapshot().last_cleanup.map(|r| r.cleaned_count()),
            Some(1)
        );
    }

    #[test]
    fn test_cancel_keeps_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("keep.tmp"), b"abc").unwrap();
        let mut state = state_for(temp.path());

        state.request_scan();
        wait_for_mode(&mut state, AppMode::Scanned);
        state.request_cleanup();
        state.cancel_cleanup();

        assert_eq!(state.mode, AppMode::Scanned);
        assert!(state.pending_cleanup().is_none());
        assert!(temp.path().join("keep.tmp").exists());
    }

    #[test]
    fn test_rejections_become_warnings() {
        let temp = TempDir::new().unwrap();
        let mut state = state_for(temp.path());

        state.request_cleanup();
        assert_eq!(warnings(&state), 1);
        assert_eq!(state.mode, AppMode::Idle);

        state.request_scan();
        state.request_scan();
        assert_eq!(warnings(&state), 2);
    }

    #[test]
    fn test_rescan_supersedes_finished_scan() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.tmp"), b"a").unwrap();
        let mut state = state_for(temp.path());

        state.request_scan();
        wait_for_mode(&mut state, AppMode::Scanned);
        state.request_scan();

        assert_eq!(state.mode, AppMode::Scanning);
        assert_eq!(state.snapshot().state, SessionState::Scanning);
        assert_eq!(warnings(&state), 0);

        wait_for_mode(&mut state, AppMode::Scanned);
        assert_eq!(warnings(&state), 0);
    }

    #[test]
    fn test_quit_refused_while_cleaning() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.tmp"), b"a").unwrap();
        let mut state = state_for(temp.path());

        state.request_scan();
        wait_for_mode(&mut state, AppMode::Scanned);
        state.request_cleanup();
        state.confirm_cleanup();

        // Still cleaning until the next update applies the result
        assert_eq!(state.mode, AppMode::Cleaning);
        state.quit();
        assert!(!state.should_quit);

        wait_for_mode(&mut state, AppMode::Idle);
        state.quit();
        assert!(state.should_quit);
    }

    #[test]
    fn test_log_is_bounded() {
        let temp = TempDir::new().unwrap();
        let mut state = state_for(temp.path());
        for i in 0..LOG_CAPACITY + 10 {
            state.push_log(LogTag::Scan, format!("line {}", i));
        }
        assert_eq!(state.log.len(), LOG_CAPACITY);
        assert_eq!(
            state.log.back().map(|l| l.text.as_str()),
            Some(format!("line {}", LOG_CAPACITY + 9).as_str())
        );
    }
}

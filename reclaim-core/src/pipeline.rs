use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::disk::{DiskInfo, DiskUsage, SystemDisk};
use crate::error::{ReclaimError, Rejection};
use crate::events::{LogLine, LogTag, PipelineEvent, Totals, WorkerMessage};
use crate::remover::{CleanupResult, Remover};
use crate::scanner::{Estimator, Manifest, Scanner};
use crate::service::{ServiceControl, ServiceCoordinator, SystemServiceControl};
use crate::session::{ScanSession, SessionState};
use crate::targets::TargetLocator;
use crate::trash::{SystemTrash, TrashStore};

/// Proof that the user was shown what a cleanup will remove.
///
/// Only [`Pipeline::prepare_cleanup`] makes one, and it is consumed by
/// [`Pipeline::confirm_cleanup`].
#[derive(Debug)]
pub struct CleanupRequest {
    pub count: u64,
    pub bytes: u64,
    generation: u64,
}

/// Read-only view of the session for the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub progress: u8,
    /// Totals of the last completed scan
    pub totals: Totals,
    /// Latest background estimate, if any
    pub advisory: Option<Totals>,
    pub estimate_superseded: bool,
    pub last_cleanup: Option<CleanupResult>,
    /// When the last scan completed
    pub last_scan_at: Option<SystemTime>,
    /// System drive when the pipeline was created
    pub disk_at_start: Option<DiskUsage>,
    /// System drive after the last cleanup, or at start
    pub disk_now: Option<DiskUsage>,
}

impl SessionSnapshot {
    /// Authoritative totals once a scan has completed, the estimate before that
    pub fn display_totals(&self) -> Totals {
        if self.estimate_superseded || self.state == SessionState::Scanned {
            self.totals
        } else {
            self.advisory.unwrap_or_default()
        }
    }

    /// Free space gained on the system drive since start
    pub fn freed_since_start(&self) -> Option<i64> {
        let (start, now) = (self.disk_at_start?, self.disk_now?);
        Some(now.free as i64 - start.free as i64)
    }
}

/// Owns the session and manifest and dispatches workers.
///
/// Lives on the thread that owns the display. Workers only talk to it
/// through the channel; [`Pipeline::poll`] applies their messages.
pub struct Pipeline {
    config: PipelineConfig,
    locator: TargetLocator,
    services: Arc<dyn ServiceControl>,
    trash: Arc<dyn TrashStore>,
    disk: Arc<dyn DiskInfo>,

    session: ScanSession,
    manifest: Option<Manifest>,
    advisory: Option<Totals>,
    estimate_started: bool,
    estimate_superseded: bool,
    last_cleanup: Option<CleanupResult>,
    last_scan_at: Option<SystemTime>,
    disk_at_start: Option<DiskUsage>,
    disk_now: Option<DiskUsage>,

    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    estimate_job: Option<JoinHandle<Totals>>,
    scan_job: Option<JoinHandle<Manifest>>,
    clean_job: Option<JoinHandle<CleanupResult>>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        locator: TargetLocator,
        services: Arc<dyn ServiceControl>,
        trash: Arc<dyn TrashStore>,
        disk: Arc<dyn DiskInfo>,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let locator = locator.with_extra_roots(config.extra_roots.iter().cloned());
        let disk_at_start = read_disk(disk.as_ref());
        Self {
            config,
            locator,
            services,
            trash,
            disk,
            session: ScanSession::new(),
            manifest: None,
            advisory: None,
            estimate_started: false,
            estimate_superseded: false,
            last_cleanup: None,
            last_scan_at: None,
            disk_at_start,
            disk_now: disk_at_start,
            tx,
            rx,
            estimate_job: None,
            scan_job: None,
            clean_job: None,
        }
    }

    /// Pipeline wired to the real environment, services and trash
    pub fn system(config: PipelineConfig) -> Self {
        Self::new(
            config,
            TargetLocator::system(),
            Arc::new(SystemServiceControl),
            Arc::new(SystemTrash),
            Arc::new(SystemDisk::system_drive()),
        )
    }

    /// Start the background estimate. Runs at most once per pipeline.
    pub fn start_estimate(&mut self) -> bool {
        if self.estimate_started {
            return false;
        }
        self.estimate_started = true;

        let targets = self.locator.locate();
        debug!(roots = targets.len(), "starting estimate");
        let estimator = Estimator::new(self.config.walk.clone());
        self.estimate_job = Some(estimator.spawn(targets, self.tx.clone()));
        true
    }

    /// Start an authoritative scan. Only allowed from idle.
    pub fn request_scan(&mut self) -> Result<(), Rejection> {
        let generation = self.session.begin_scan()?;
        self.manifest = None;

        let targets = self.locator.locate();
        info!(generation, roots = targets.len(), "scan started");
        let scanner = Scanner::new(self.config.walk.clone());
        self.scan_job = Some(scanner.spawn(targets, self.tx.clone()));
        Ok(())
    }

    /// Drop a finished scan so a new one can start
    pub fn discard_scan(&mut self) -> Result<(), Rejection> {
        self.session.discard()?;
        self.manifest = None;
        debug!("scan discarded");
        Ok(())
    }

    /// First half of the confirmation gate: what would be removed
    pub fn prepare_cleanup(&self) -> Result<CleanupRequest, Rejection> {
        self.session.can_begin_cleanup()?;
        let totals = self
            .manifest
            .as_ref()
            .map(Manifest::totals)
            .ok_or(Rejection::NotScanned)?;
        Ok(CleanupRequest {
            count: totals.count,
            bytes: totals.bytes,
            generation: self.session.generation(),
        })
    }

    /// Second half of the confirmation gate: start removing
    pub fn confirm_cleanup(&mut self, request: CleanupRequest) -> Result<(), Rejection> {
        if request.generation != self.session.generation() {
            return Err(Rejection::StaleConfirmation);
        }
        self.session.can_begin_cleanup()?;
        let Some(manifest) = self.manifest.take() else {
            return Err(Rejection::NotScanned);
        };
        self.session.begin_cleanup()?;

        let mut remover = Remover::new();
        if let Some(service) = &self.config.service {
            remover = remover.with_services(ServiceCoordinator::new(
                self.services.clone(),
                service.clone(),
                self.config.service_settle,
            ));
        }
        if self.config.empty_trash {
            remover = remover.with_trash(self.trash.clone());
        }

        info!(entries = manifest.len(), "cleanup started");
        self.clean_job = Some(remover.spawn(manifest, self.tx.clone()));
        Ok(())
    }

    /// Apply everything the workers have sent so far
    pub fn poll(&mut self) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        self.drain(&mut events);
        self.reap(&mut events);
        events
    }

    /// Like [`poll`](Self::poll), but wait up to `timeout` for the first message
    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        if let Ok(msg) = self.rx.recv_timeout(timeout) {
            self.apply(msg, &mut events);
        }
        self.drain(&mut events);
        self.reap(&mut events);
        events
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.session.state(),
            progress: self.session.progress(),
            totals: self.session.totals(),
            advisory: self.advisory,
            estimate_superseded: self.estimate_superseded,
            last_cleanup: self.last_cleanup,
            last_scan_at: self.last_scan_at,
            disk_at_start: self.disk_at_start,
            disk_now: self.disk_now,
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// A scan or cleanup is running
    pub fn is_busy(&self) -> bool {
        self.scan_job.is_some() || self.clean_job.is_some()
    }

    pub fn is_estimating(&self) -> bool {
        self.estimate_job.is_some()
    }

    fn drain(&mut self, events: &mut Vec<PipelineEvent>) {
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg, events);
        }
    }

    fn apply(&mut self, msg: WorkerMessage, events: &mut Vec<PipelineEvent>) {
        match msg {
            WorkerMessage::Log(line) => events.push(PipelineEvent::Log(line)),
            WorkerMessage::Estimate(totals) => self.apply_estimate(totals, events),
            WorkerMessage::EstimateFinished(totals) => {
                self.apply_estimate(totals, events);
                self.complete_estimate(events);
            }
            WorkerMessage::ScanProgress(percent) => {
                if self.session.state() == SessionState::Scanning {
                    self.session.set_progress(percent);
                    events.push(PipelineEvent::ScanProgress(self.session.progress()));
                }
            }
            WorkerMessage::ScanFinished => self.complete_scan(events),
            WorkerMessage::CleanProgress { processed, total } => {
                events.push(PipelineEvent::CleanProgress { processed, total });
            }
            WorkerMessage::CleanFinished => self.complete_cleanup(events),
        }
    }

    fn apply_estimate(&mut self, totals: Totals, events: &mut Vec<PipelineEvent>) {
        if self.estimate_superseded {
            return;
        }
        self.advisory = Some(totals);
        events.push(PipelineEvent::Estimate(totals));
    }

    /// Collect workers that exited without their final message
    fn reap(&mut self, events: &mut Vec<PipelineEvent>) {
        let any_finished = finished(&self.scan_job)
            || finished(&self.clean_job)
            || finished(&self.estimate_job);
        if !any_finished {
            return;
        }

        // Whatever a finished worker sent is in the channel by now
        self.drain(events);

        if finished(&self.scan_job) {
            self.complete_scan(events);
        }
        if finished(&self.clean_job) {
            self.complete_cleanup(events);
        }
        if finished(&self.estimate_job) {
            self.complete_estimate(events);
        }
    }

    fn complete_estimate(&mut self, events: &mut Vec<PipelineEvent>) {
        let Some(handle) = self.estimate_job.take() else {
            return;
        };
        if handle.join().is_err() {
            events.push(worker_lost("size estimate"));
        }
    }

    fn complete_scan(&mut self, events: &mut Vec<PipelineEvent>) {
        let Some(handle) = self.scan_job.take() else {
            return;
        };
        match handle.join() {
            Ok(manifest) => {
                let totals = manifest.totals();
                self.session.finish_scan(totals);
                self.manifest = Some(manifest);
                self.estimate_superseded = true;
                self.last_scan_at = Some(SystemTime::now());
                info!(files = totals.count, bytes = totals.bytes, "scan completed");
                events.push(PipelineEvent::ScanCompleted(totals));
            }
            Err(_) => {
                self.session.abandon();
                self.manifest = None;
                events.push(worker_lost("scan"));
            }
        }
    }

    fn complete_cleanup(&mut self, events: &mut Vec<PipelineEvent>) {
        let Some(handle) = self.clean_job.take() else {
            return;
        };
        match handle.join() {
            Ok(result) => {
                self.session.finish_cleanup();
                self.last_cleanup = Some(result);
                if let Some(usage) = read_disk(self.disk.as_ref()) {
                    self.disk_now = Some(usage);
                }
                info!(
                    cleaned = result.cleaned_count(),
                    bytes = result.cleaned_bytes(),
                    failed = result.failed_count(),
                    "cleanup completed"
                );
                events.push(PipelineEvent::CleanupCompleted(result));
            }
            Err(_) => {
                self.session.abandon();
                events.push(worker_lost("cleanup"));
            }
        }
    }
}

fn finished<T>(job: &Option<JoinHandle<T>>) -> bool {
    job.as_ref().is_some_and(JoinHandle::is_finished)
}

fn worker_lost(worker: &'static str) -> PipelineEvent {
    let err = ReclaimError::WorkerPanicked(worker);
    warn!("{} worker panicked", worker);
    PipelineEvent::Log(LogLine::new(LogTag::Warning, err.to_string()))
}

fn read_disk(disk: &dyn DiskInfo) -> Option<DiskUsage> {
    match disk.usage() {
        Ok(usage) => Some(usage),
        Err(e) => {
            warn!("disk usage unavailable: {}", e);
            None
        }
    }
}

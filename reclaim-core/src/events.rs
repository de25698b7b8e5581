use std::fmt;

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use crate::remover::CleanupResult;

/// Category of a display log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Background,
    Scan,
    Found,
    Warning,
    Done,
    Stats,
    Service,
    Cleaned,
    Trash,
}

impl LogTag {
    pub fn label(self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Background => "background",
            LogTag::Scan => "scan",
            LogTag::Found => "found",
            LogTag::Warning => "warning",
            LogTag::Done => "done",
            LogTag::Stats => "stats",
            LogTag::Service => "service",
            LogTag::Cleaned => "cleaned",
            LogTag::Trash => "trash",
        }
    }
}

/// A tagged line for the display's log pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub tag: LogTag,
    pub text: String,
}

impl LogLine {
    pub fn new(tag: LogTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag.label(), self.text)
    }
}

/// Running file count and byte total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub count: u64,
    pub bytes: u64,
}

impl Totals {
    pub fn add(&mut self, bytes: u64) {
        self.count += 1;
        self.bytes += bytes;
    }
}

/// Messages sent from worker threads to the pipeline
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    Log(LogLine),
    /// Advisory totals from the background estimate
    Estimate(Totals),
    EstimateFinished(Totals),
    /// Scan progress percentage (0-100)
    ScanProgress(u8),
    ScanFinished,
    CleanProgress { processed: usize, total: usize },
    CleanFinished,
}

/// What the pipeline hands to the display after applying worker messages
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Log(LogLine),
    Estimate(Totals),
    ScanProgress(u8),
    ScanCompleted(Totals),
    CleanProgress { processed: usize, total: usize },
    CleanupCompleted(CleanupResult),
}

/// Sending half handed to each worker. Lines are mirrored into tracing.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: Sender<WorkerMessage>,
}

impl Reporter {
    pub fn new(tx: Sender<WorkerMessage>) -> Self {
        Self { tx }
    }

    /// Reporter plus the receiver the consumer drains
    pub fn channel() -> (Self, Receiver<WorkerMessage>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    pub fn log(&self, tag: LogTag, text: impl Into<String>) {
        let line = LogLine::new(tag, text);
        match tag {
            LogTag::Warning => warn!(tag = tag.label(), "{}", line.text),
            _ => info!(tag = tag.label(), "{}", line.text),
        }
        self.send(WorkerMessage::Log(line));
    }

    pub fn send(&self, message: WorkerMessage) {
        // The consumer may be gone during shutdown
        let _ = self.tx.send(message);
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::Result;
use crate::events::{LogTag, Reporter};

/// OS primitive for stopping and starting a named service
pub trait ServiceControl: Send + Sync {
    fn stop(&self, service: &str) -> Result<()>;
    fn start(&self, service: &str) -> Result<()>;
}

/// Service control through the platform's `net` command
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemServiceControl;

#[cfg(windows)]
impl SystemServiceControl {
    fn net(action: &str, service: &str) -> Result<()> {
        use std::process::{Command, Stdio};

        let status = Command::new("net")
            .args([action, service])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(crate::ReclaimError::ServiceControl {
                service: service.to_string(),
                reason: format!("net {} exited with {}", action, status),
            })
        }
    }
}

#[cfg(windows)]
impl ServiceControl for SystemServiceControl {
    fn stop(&self, service: &str) -> Result<()> {
        Self::net("stop", service)
    }

    fn start(&self, service: &str) -> Result<()> {
        Self::net("start", service)
    }
}

#[cfg(not(windows))]
impl ServiceControl for SystemServiceControl {
    fn stop(&self, _service: &str) -> Result<()> {
        Err(crate::ReclaimError::Unsupported("service control"))
    }

    fn start(&self, _service: &str) -> Result<()> {
        Err(crate::ReclaimError::Unsupported("service control"))
    }
}

/// Best-effort stop/start of one service around a cleanup.
/// Failures are logged and never returned.
#[derive(Clone)]
pub struct ServiceCoordinator {
    control: Arc<dyn ServiceControl>,
    service: String,
    settle: Duration,
}

impl ServiceCoordinator {
    pub fn new(control: Arc<dyn ServiceControl>, service: impl Into<String>, settle: Duration) -> Self {
        Self {
            control,
            service: service.into(),
            settle,
        }
    }

    /// Ask the service to halt, then wait for it to let go of its files
    pub fn stop(&self, reporter: &Reporter) {
        reporter.log(LogTag::Service, format!("Stopping {} service...", self.service));
        match self.control.stop(&self.service) {
            Ok(()) => reporter.log(LogTag::Service, format!("{} service stopped", self.service)),
            Err(e) => {
                warn!(service = %self.service, "stop failed: {}", e);
                reporter.log(
                    LogTag::Warning,
                    format!("Could not stop {} service, continuing", self.service),
                );
            }
        }
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }

    pub fn start(&self, reporter: &Reporter) {
        reporter.log(LogTag::Service, format!("Starting {} service...", self.service));
        match self.control.start(&self.service) {
            Ok(()) => reporter.log(LogTag::Service, format!("{} service started", self.service)),
            Err(e) => {
                warn!(service = %self.service, "start failed: {}", e);
                reporter.log(
                    LogTag::Warning,
                    format!("Could not start {} service", self.service),
                );
            }
        }
    }
}

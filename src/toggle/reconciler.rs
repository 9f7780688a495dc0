use super::settle::{PollSettings, SettleStrategy};
use crate::error::ControlError;
use crate::runtime::{ContainerFacade, LifecycleStatus, WorkloadHandle};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Started,
    Stopped,
}

impl ToggleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
        }
    }

    /// Whether `status` is the side this action moves the workload to
    fn reached(&self, status: &LifecycleStatus) -> bool {
        match self {
            Self::Started => status.is_running(),
            Self::Stopped => !status.is_running(),
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    /// Status re-read from the runtime after settling, not assumed
    pub settled_status: LifecycleStatus,
}

/// Flips the workload between running and not running.
///
/// Concurrent toggles are not coordinated unless the single-flight lock is
/// enabled with [`ToggleReconciler::with_single_flight`].
pub struct ToggleReconciler {
    facade: ContainerFacade,
    settle: SettleStrategy,
    single_flight: Option<Arc<Mutex<()>>>,
}

impl ToggleReconciler {
    pub fn new(facade: ContainerFacade, settle: SettleStrategy) -> Self {
        Self {
            facade,
            settle,
            single_flight: None,
        }
    }

    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled.then(|| Arc::new(Mutex::new(())));
        self
    }

    pub fn settle_strategy(&self) -> SettleStrategy {
        self.settle
    }

    /// Start or stop the workload and report the status it settled in
    pub async fn toggle(&self) -> Result<ToggleOutcome, ControlError> {
        let _guard = match &self.single_flight {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let handle = self.facade.get().await?;
        let action = self.issue(&handle).await?;
        let settled_status = self.settle(&handle, action).await?;

        info!(
            workload = %self.facade.name(),
            action = %action,
            status = %settled_status,
            "Toggle completed"
        );

        Ok(ToggleOutcome {
            action,
            settled_status,
        })
    }

    /// Issue the transition without waiting for the workload to settle
    pub async fn flip(&self) -> Result<ToggleAction, ControlError> {
        let _guard = match &self.single_flight {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let handle = self.facade.get().await?;
        self.issue(&handle).await
    }

    async fn issue(&self, handle: &WorkloadHandle) -> Result<ToggleAction, ControlError> {
        if handle.status().is_running() {
            debug!(workload = %self.facade.name(), "Workload running, stopping");
            self.facade.stop(handle).await?;
            Ok(ToggleAction::Stopped)
        } else {
            debug!(
                workload = %self.facade.name(),
                status = %handle.status(),
                "Workload not running, starting"
            );
            self.facade.start(handle).await?;
            Ok(ToggleAction::Started)
        }
    }

    async fn settle(
        &self,
        handle: &WorkloadHandle,
        action: ToggleAction,
    ) -> Result<LifecycleStatus, ControlError> {
        match self.settle {
            SettleStrategy::Fixed(delay) => {
                sleep(delay).await;
                let (status, _) = self.facade.current_status(handle).await?;
                Ok(status)
            }
            SettleStrategy::Poll(settings) => self.poll(handle, action, settings).await,
        }
    }

    async fn poll(
        &self,
        handle: &WorkloadHandle,
        action: ToggleAction,
        settings: PollSettings,
    ) -> Result<LifecycleStatus, ControlError> {
        let deadline = Instant::now() + settings.deadline;
        let mut attempt = 0u32;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(settings.interval(attempt).min(remaining)).await;

            let (status, _) = self.facade.current_status(handle).await?;
            if action.reached(&status) {
                debug!(attempts = attempt + 1, status = %status, "Workload settled");
                return Ok(status);
            }

            if Instant::now() >= deadline {
                warn!(
                    workload = %self.facade.name(),
                    action = %action,
                    status = %status,
                    "Workload did not settle before deadline"
                );
                return Ok(status);
            }

            attempt += 1;
        }
    }
}

use super::client::ContainerRuntime;
use super::types::{ContainerSnapshot, LifecycleStatus, NetworkAttachment};
use crate::error::ControlError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Inspect,
    Start,
    Stop,
}

/// A call the mock received, with the container reference it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Inspect(String),
    Start(String),
    Stop(String),
}

struct ScriptedFailure {
    successes_left: usize,
    error: ControlError,
}

#[derive(Default)]
struct MockState {
    workload: Option<ContainerSnapshot>,
    scripted_statuses: VecDeque<LifecycleStatus>,
    hold_status: bool,
    failures: HashMap<MockOperation, ScriptedFailure>,
    calls: Vec<MockCall>,
}

/// In-memory container runtime for running without Docker.
///
/// Holds at most one workload. Start and stop flip its status to
/// `running`/`exited` unless [`MockRuntime::hold_status`] is set, and
/// scripted statuses are handed out one per inspect call.
#[derive(Clone, Default)]
pub struct MockRuntime {
    state: Arc<Mutex<MockState>>,
}

impl MockRuntime {
    /// A runtime with no workload registered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workload<S: Into<LifecycleStatus>>(self, name: &str, status: S) -> Self {
        self.lock().workload = Some(ContainerSnapshot {
            id: format!("mock-{}", name),
            name: name.to_string(),
            status: status.into(),
            health: None,
            networks: Vec::new(),
        });
        self
    }

    pub fn with_network(self, network: &str, ip_address: Option<&str>) -> Self {
        if let Some(workload) = self.lock().workload.as_mut() {
            workload
                .networks
                .push(NetworkAttachment::new(network, ip_address));
        }
        self
    }

    pub fn with_health(self, health: &str) -> Self {
        if let Some(workload) = self.lock().workload.as_mut() {
            workload.health = Some(health.to_string());
        }
        self
    }

    pub fn set_status<S: Into<LifecycleStatus>>(&self, status: S) {
        if let Some(workload) = self.lock().workload.as_mut() {
            workload.status = status.into();
        }
    }

    pub fn remove_workload(&self) {
        self.lock().workload = None;
    }

    /// Keep the current status across start/stop, as if the runtime lagged behind
    pub fn hold_status(&self, hold: bool) {
        self.lock().hold_status = hold;
    }

    /// Statuses returned by the next inspect calls, one per call
    pub fn script_statuses<I, S>(&self, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<LifecycleStatus>,
    {
        self.lock()
            .scripted_statuses
            .extend(statuses.into_iter().map(Into::into));
    }

    /// Make every call to `operation` fail with `error` until cleared
    pub fn fail(&self, operation: MockOperation, error: ControlError) {
        self.fail_after(operation, 0, error);
    }

    /// Let `successes` calls to `operation` through, then fail the rest
    pub fn fail_after(&self, operation: MockOperation, successes: usize, error: ControlError) {
        self.lock().failures.insert(
            operation,
            ScriptedFailure {
                successes_left: successes,
                error,
            },
        );
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, operation: MockOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| {
                matches!(
                    (operation, call),
                    (MockOperation::Inspect, MockCall::Inspect(_))
                        | (MockOperation::Start, MockCall::Start(_))
                        | (MockOperation::Stop, MockCall::Stop(_))
                )
            })
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(
        &self,
        container: &str,
        operation: MockOperation,
        target: LifecycleStatus,
    ) -> Result<(), ControlError> {
        let mut state = self.lock();
        state.calls.push(match operation {
            MockOperation::Start => MockCall::Start(container.to_string()),
            _ => MockCall::Stop(container.to_string()),
        });

        if let Some(error) = state.take_failure(operation) {
            return Err(error);
        }

        let hold = state.hold_status;
        let workload = matching(&mut state.workload, container)
            .ok_or_else(|| ControlError::not_found(container))?;

        if !hold {
            workload.status = target;
        }
        debug!(container = %container, status = %workload.status, "mock transition");
        Ok(())
    }
}

impl MockState {
    fn take_failure(&mut self, operation: MockOperation) -> Option<ControlError> {
        let failure = self.failures.get_mut(&operation)?;
        if failure.successes_left > 0 {
            failure.successes_left -= 1;
            return None;
        }
        Some(failure.error.clone())
    }
}

fn matching<'a>(
    workload: &'a mut Option<ContainerSnapshot>,
    container: &str,
) -> Option<&'a mut ContainerSnapshot> {
    workload
        .as_mut()
        .filter(|w| w.name == container || w.id == container)
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot, ControlError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Inspect(container.to_string()));

        if let Some(error) = state.take_failure(MockOperation::Inspect) {
            return Err(error);
        }

        let next = state.scripted_statuses.pop_front();
        let workload = matching(&mut state.workload, container)
            .ok_or_else(|| ControlError::not_found(container))?;

        if let Some(status) = next {
            workload.status = status;
        }
        Ok(workload.clone())
    }

    async fn start(&self, container: &str) -> Result<(), ControlError> {
        self.transition(container, MockOperation::Start, LifecycleStatus::Running)
    }

    async fn stop(&self, container: &str) -> Result<(), ControlError> {
        self.transition(container, MockOperation::Stop, LifecycleStatus::Exited)
    }
}

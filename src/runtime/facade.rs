use super::client::DynContainerRuntime;
use super::types::{ContainerSnapshot, LifecycleStatus, NetworkAttachment};
use crate::error::ControlError;
use std::sync::Arc;
use tracing::debug;

/// A workload as observed by the last [`ContainerFacade::get`]
#[derive(Debug, Clone)]
pub struct WorkloadHandle {
    snapshot: ContainerSnapshot,
}

impl WorkloadHandle {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    /// Status captured when the handle was fetched
    pub fn status(&self) -> &LifecycleStatus {
        &self.snapshot.status
    }

    pub fn health(&self) -> Option<&str> {
        self.snapshot.health.as_deref()
    }

    pub fn networks(&self) -> &[NetworkAttachment] {
        &self.snapshot.networks
    }
}

/// Control surface over the single managed workload.
///
/// Every call goes to the runtime; nothing is cached between calls.
#[derive(Clone)]
pub struct ContainerFacade {
    runtime: DynContainerRuntime,
    name: Arc<str>,
}

impl ContainerFacade {
    pub fn new<S: AsRef<str>>(runtime: DynContainerRuntime, name: S) -> Self {
        Self {
            runtime,
            name: Arc::from(name.as_ref()),
        }
    }

    /// Logical name of the managed workload
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self) -> Result<WorkloadHandle, ControlError> {
        let snapshot = self.runtime.inspect(&self.name).await?;
        debug!(
            workload = %self.name,
            status = %snapshot.status,
            "Fetched workload"
        );
        Ok(WorkloadHandle { snapshot })
    }

    /// Read the live lifecycle and health status for `handle`
    pub async fn current_status(
        &self,
        handle: &WorkloadHandle,
    ) -> Result<(LifecycleStatus, Option<String>), ControlError> {
        let snapshot = self.runtime.inspect(handle.id()).await?;
        Ok((snapshot.status, snapshot.health))
    }

    pub async fn start(&self, handle: &WorkloadHandle) -> Result<(), ControlError> {
        self.runtime.start(handle.id()).await
    }

    pub async fn stop(&self, handle: &WorkloadHandle) -> Result<(), ControlError> {
        self.runtime.stop(handle.id()).await
    }

    /// Pick the address the workload has on its attached networks.
    ///
    /// A non-empty address on `preferred_network` wins; otherwise the first
    /// network with a non-empty address, in enumeration order.
    pub fn network_address(
        &self,
        handle: &WorkloadHandle,
        preferred_network: Option<&str>,
    ) -> Option<String> {
        let networks = handle.networks();

        let preferred = preferred_network.and_then(|preferred| {
            networks
                .iter()
                .find(|attachment| attachment.network == preferred)
                .and_then(NetworkAttachment::address)
        });

        preferred
            .or_else(|| networks.iter().find_map(NetworkAttachment::address))
            .map(str::to_string)
    }
}

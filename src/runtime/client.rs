use super::types::ContainerSnapshot;
use crate::error::ControlError;
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the dashboard needs from a container runtime.
///
/// `container` may be a container name or id. Implementations map a
/// missing container to [`ControlError::NotFound`] and every other failure
/// to [`ControlError::Runtime`].
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot, ControlError>;

    async fn start(&self, container: &str) -> Result<(), ControlError>;

    async fn stop(&self, container: &str) -> Result<(), ControlError>;
}

pub type DynContainerRuntime = Arc<dyn ContainerRuntime>;

//! Container control: the injected runtime client and the facade the rest
//! of the crate talks to.

mod client;
mod docker;
mod facade;
mod mock;
mod types;

pub use client::{ContainerRuntime, DynContainerRuntime};
pub use docker::DockerRuntime;
pub use facade::{ContainerFacade, WorkloadHandle};
pub use mock::{MockCall, MockOperation, MockRuntime};
pub use types::{ContainerSnapshot, LifecycleStatus, NetworkAttachment};

pub mod app;
pub mod config;
pub mod error;
pub mod probe;
pub mod resolver;
pub mod runtime;
pub mod status;
pub mod toggle;
pub mod web;

pub use app::{McControlApp, ShutdownReason};
pub use config::McControlConfig;
pub use error::{ControlError, McControlError, Result};
pub use probe::{probe, ProbeAttempt, ProbeTarget, Prober, ReachabilityResult, TcpProber};
pub use resolver::AddressResolver;
pub use runtime::{
    ContainerFacade, ContainerRuntime, DockerRuntime, LifecycleStatus, MockRuntime, WorkloadHandle,
};
pub use status::{StatusAggregator, StatusReport};
pub use toggle::{SettleStrategy, ToggleAction, ToggleOutcome, ToggleReconciler};
pub use web::{DashboardServer, DashboardServerBuilder};

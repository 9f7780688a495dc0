use crate::config::McControlConfig;
use crate::error::Result;
use crate::probe::TcpProber;
use crate::resolver::AddressResolver;
use crate::runtime::{ContainerFacade, DockerRuntime, DynContainerRuntime};
use crate::status::{StatusAggregator, StatusReport};
use crate::toggle::{SettleStrategy, ToggleReconciler};
use crate::web::{DashboardServer, DashboardServerBuilder};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Wires the facade, reconciler, aggregator and HTTP server together
pub struct McControlApp {
    pub(super) config: McControlConfig,
    pub(super) facade: ContainerFacade,
    pub(super) reconciler: Arc<ToggleReconciler>,
    pub(super) aggregator: Arc<StatusAggregator>,
    pub(super) cancellation_token: CancellationToken,
}

impl McControlApp {
    /// Build the application around an already constructed runtime client
    pub fn new(config: McControlConfig, runtime: DynContainerRuntime) -> Self {
        let facade = ContainerFacade::new(runtime, &config.workload.name);

        let reconciler = ToggleReconciler::new(
            facade.clone(),
            SettleStrategy::from_config(&config.toggle),
        )
        .with_single_flight(config.toggle.serialize);

        let resolver = AddressResolver::new(facade.clone(), Arc::new(TcpProber))
            .with_preferred_network(config.workload.preferred_network.clone())
            .with_loopback_host(config.probe.loopback_host.clone());

        let aggregator = StatusAggregator::new(
            facade.clone(),
            resolver,
            config.workload.service_port,
            config.probe_timeout(),
        );

        info!(
            workload = %config.workload.name,
            port = config.workload.service_port,
            settle = ?reconciler.settle_strategy(),
            serialize = config.toggle.serialize,
            "Application components initialized"
        );

        Self {
            config,
            facade,
            reconciler: Arc::new(reconciler),
            aggregator: Arc::new(aggregator),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Connect to the local Docker daemon and build the application
    pub fn connect(config: McControlConfig) -> Result<Self> {
        let runtime = DockerRuntime::connect(&config.runtime)?;
        Ok(Self::new(config, Arc::new(runtime)))
    }

    pub fn config(&self) -> &McControlConfig {
        &self.config
    }

    pub fn facade(&self) -> &ContainerFacade {
        &self.facade
    }

    pub async fn status_report(&self) -> StatusReport {
        self.aggregator.build_status_report().await
    }

    pub fn server(&self) -> Result<DashboardServer> {
        DashboardServerBuilder::new()
            .config(self.config.server.clone())
            .reconciler(Arc::clone(&self.reconciler))
            .aggregator(Arc::clone(&self.aggregator))
            .build()
    }

    /// Token that stops the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }
}

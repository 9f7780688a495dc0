use super::report::{ContainerFields, StatusReport};
use crate::error::ControlError;
use crate::resolver::AddressResolver;
use crate::runtime::{ContainerFacade, LifecycleStatus};
use std::time::Duration;
use tracing::warn;

/// Builds [`StatusReport`]s. Never fails; each sub-check degrades to a field.
pub struct StatusAggregator {
    facade: ContainerFacade,
    resolver: AddressResolver,
    service_port: u16,
    probe_timeout: Duration,
}

impl StatusAggregator {
    pub fn new(
        facade: ContainerFacade,
        resolver: AddressResolver,
        service_port: u16,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            facade,
            resolver,
            service_port,
            probe_timeout,
        }
    }

    pub async fn build_status_report(&self) -> StatusReport {
        let (container, reachability) = tokio::join!(
            self.container_fields(),
            self.resolver.resolve_reachability(
                self.facade.name(),
                self.service_port,
                self.probe_timeout,
            )
        );

        if !reachability.online {
            warn!(
                workload = %self.facade.name(),
                attempts = %reachability.diagnostic_summary.as_deref().unwrap_or(""),
                "Workload service unreachable"
            );
        }

        StatusReport::new(container, reachability)
    }

    async fn container_fields(&self) -> ContainerFields {
        match self.facade.get().await {
            Ok(handle) => ContainerFields {
                status: Some(handle.status().to_string()),
                health: handle.health().map(str::to_string),
                error: None,
            },
            Err(ControlError::NotFound { .. }) => ContainerFields {
                status: Some(LifecycleStatus::NotFound.to_string()),
                health: None,
                error: None,
            },
            Err(e) => {
                warn!("Container status check failed: {}", e);
                ContainerFields {
                    error: Some(e.to_string()),
                    ..ContainerFields::default()
                }
            }
        }
    }
}

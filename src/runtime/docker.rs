use super::client::ContainerRuntime;
use super::types::{ContainerSnapshot, LifecycleStatus, NetworkAttachment};
use crate::config::RuntimeConfig;
use crate::error::ControlError;
use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, StartContainerOptions, StopContainerOptions};
use bollard::errors::Error as DockerError;
use bollard::models::ContainerInspectResponse;
use bollard::Docker;
use std::time::Duration;
use tracing::{debug, info};

/// [`ContainerRuntime`] backed by the local Docker daemon
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
    stop_timeout_secs: i64,
}

impl DockerRuntime {
    /// Connect using the standard local defaults (`DOCKER_HOST` or the unix socket)
    pub fn connect(config: &RuntimeConfig) -> Result<Self, ControlError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| ControlError::runtime(format!("Failed to connect to Docker: {}", e)))?
            .with_timeout(Duration::from_secs(config.timeout_secs));

        info!(
            "Docker client configured (request timeout {}s)",
            config.timeout_secs
        );

        Ok(Self::with_client(docker, config.stop_timeout_secs))
    }

    pub fn with_client(docker: Docker, stop_timeout_secs: i64) -> Self {
        Self {
            docker,
            stop_timeout_secs,
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot, ControlError> {
        let response = self
            .docker
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
            .map_err(|e| classify(container, e))?;

        Ok(snapshot_from_inspect(container, response))
    }

    async fn start(&self, container: &str) -> Result<(), ControlError> {
        match self
            .docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
        {
            Ok(()) => {
                debug!(container = %container, "Container start issued");
                Ok(())
            }
            Err(DockerError::DockerResponseServerError {
                status_code: 304, ..
            }) => {
                debug!(container = %container, "Container already started");
                Ok(())
            }
            Err(e) => Err(classify(container, e)),
        }
    }

    async fn stop(&self, container: &str) -> Result<(), ControlError> {
        let options = StopContainerOptions {
            t: self.stop_timeout_secs,
        };

        match self.docker.stop_container(container, Some(options)).await {
            Ok(()) => {
                debug!(container = %container, "Container stop issued");
                Ok(())
            }
            Err(DockerError::DockerResponseServerError {
                status_code: 304, ..
            }) => {
                debug!(container = %container, "Container already stopped");
                Ok(())
            }
            Err(e) => Err(classify(container, e)),
        }
    }
}

fn classify(container: &str, err: DockerError) -> ControlError {
    match err {
        DockerError::DockerResponseServerError {
            status_code: 404, ..
        } => ControlError::not_found(container),
        other => ControlError::runtime(other.to_string()),
    }
}

/// Flatten an inspect response into the fields the dashboard uses.
///
/// Docker returns networks as a JSON object, which bollard decodes into a
/// `HashMap`; attachments are sorted by network name so repeated lookups
/// pick the same address.
pub(crate) fn snapshot_from_inspect(
    requested: &str,
    response: ContainerInspectResponse,
) -> ContainerSnapshot {
    let state = response.state.unwrap_or_default();

    let status = state
        .status
        .map(|status| LifecycleStatus::from_runtime(&status.to_string()))
        .unwrap_or(LifecycleStatus::Unknown);

    let health = state
        .health
        .and_then(|health| health.status)
        .map(|status| status.to_string())
        .filter(|status| !status.is_empty());

    let mut networks: Vec<NetworkAttachment> = response
        .network_settings
        .and_then(|settings| settings.networks)
        .unwrap_or_default()
        .into_iter()
        .map(|(network, endpoint)| NetworkAttachment {
            network,
            ip_address: endpoint.ip_address,
        })
        .collect();
    networks.sort_by(|a, b| a.network.cmp(&b.network));

    let name = response
        .name
        .map(|name| name.trim_start_matches('/').to_string())
        .unwrap_or_else(|| requested.to_string());

    ContainerSnapshot {
        id: response.id.unwrap_or_else(|| requested.to_string()),
        name,
        status,
        health,
        networks,
    }
}

use crate::probe::{ProbeAttempt, ProbeTarget, Prober, ReachabilityResult};
use crate::runtime::ContainerFacade;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_LOOPBACK_HOST: &str = "127.0.0.1";

/// Works out whether the workload's service port is reachable.
///
/// Candidates are tried in a fixed order and the first success wins:
///
/// 1. the logical name as a host (runtime-provided DNS)
/// 2. the container's address on its attached networks, if it has one and
///    it differs from the logical name
/// 3. the loopback host, for ports published straight to the host
pub struct AddressResolver {
    facade: ContainerFacade,
    prober: Arc<dyn Prober>,
    preferred_network: Option<String>,
    loopback_host: String,
}

impl AddressResolver {
    pub fn new(facade: ContainerFacade, prober: Arc<dyn Prober>) -> Self {
        Self {
            facade,
            prober,
            preferred_network: None,
            loopback_host: DEFAULT_LOOPBACK_HOST.to_string(),
        }
    }

    pub fn with_preferred_network(mut self, network: Option<String>) -> Self {
        self.preferred_network = network;
        self
    }

    pub fn with_loopback_host<S: Into<String>>(mut self, host: S) -> Self {
        self.loopback_host = host.into();
        self
    }

    pub async fn resolve_reachability(
        &self,
        logical_name: &str,
        port: u16,
        timeout: Duration,
    ) -> ReachabilityResult {
        let mut attempts = Vec::with_capacity(3);

        if self.attempt(&mut attempts, logical_name, port, timeout).await {
            return ReachabilityResult::online(attempts);
        }

        match self.container_address().await {
            Some(address) if address != logical_name => {
                if self.attempt(&mut attempts, &address, port, timeout).await {
                    return ReachabilityResult::online(attempts);
                }
            }
            Some(_) => debug!("Container address equals logical name, skipping"),
            None => debug!("No container network address available"),
        }

        if self
            .attempt(&mut attempts, &self.loopback_host, port, timeout)
            .await
        {
            return ReachabilityResult::online(attempts);
        }

        ReachabilityResult::offline(attempts)
    }

    async fn attempt(
        &self,
        attempts: &mut Vec<ProbeAttempt>,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> bool {
        let target = ProbeTarget::new(host, port, timeout);
        let outcome = self.prober.probe(&target).await;
        debug!(
            target = %target,
            success = outcome.success,
            error = outcome.error.as_deref().unwrap_or(""),
            "Probe attempt"
        );

        let success = outcome.success;
        attempts.push(ProbeAttempt::new(target, outcome));
        success
    }

    /// Any lookup failure simply means there is no address to try
    async fn container_address(&self) -> Option<String> {
        match self.facade.get().await {
            Ok(handle) => self
                .facade
                .network_address(&handle, self.preferred_network.as_deref()),
            Err(e) => {
                debug!("Container address lookup failed: {}", e);
                None
            }
        }
    }
}

use super::types::{ProbeOutcome, ProbeTarget};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;
use tracing::trace;

/// Something that can tell whether a target accepts connections
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome;
}

/// Plain TCP connect prober
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome {
        probe(&target.host, target.port, target.timeout).await
    }
}

/// Try a TCP handshake with `host:port`, bounded by `timeout`.
///
/// Name resolution counts against the timeout. The connection is dropped
/// as soon as it is established; nothing is written.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> ProbeOutcome {
    match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            trace!("tcp {}:{} accepted connection", host, port);
            ProbeOutcome::ok()
        }
        Ok(Err(err)) => ProbeOutcome::failed(err.to_string()),
        Err(_) => ProbeOutcome::failed(format!("timed out after {:?}", timeout)),
    }
}

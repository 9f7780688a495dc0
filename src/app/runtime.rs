use super::{McControlApp, ShutdownReason};
use crate::error::Result;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

impl McControlApp {
    /// Serve the dashboard until a shutdown signal arrives or the token is cancelled
    pub async fn run(&self) -> Result<ShutdownReason> {
        info!("mccontrol is running");

        let server = self.server()?;
        let token = self.cancellation_token.clone();
        let (reason_sender, mut reason_receiver) = oneshot::channel();

        Self::setup_signal_handlers(token.clone(), reason_sender);

        server.start(token).await?;

        let reason = reason_receiver
            .try_recv()
            .unwrap_or(ShutdownReason::Cancelled);
        info!("Shutdown complete: {:?}", reason);
        Ok(reason)
    }

    /// Cancel `token` on SIGTERM or SIGINT, reporting which one fired
    fn setup_signal_handlers(
        token: CancellationToken,
        reason_sender: oneshot::Sender<ShutdownReason>,
    ) {
        let reason_sender = Arc::new(Mutex::new(Some(reason_sender)));

        // Handle SIGTERM (docker/systemd stop) - Unix only
        #[cfg(unix)]
        {
            let token = token.clone();
            let reason_sender = Arc::clone(&reason_sender);
            tokio::spawn(async move {
                let mut sigterm =
                    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                        Ok(sigterm) => sigterm,
                        Err(e) => {
                            error!("Failed to register SIGTERM handler: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM signal");
                        Self::trigger(&reason_sender, &token, "SIGTERM").await;
                    }
                    _ = token.cancelled() => {}
                }
            });
        }

        tokio::spawn(async move {
            tokio::select! {
                result = signal::ctrl_c() => {
                    if result.is_ok() {
                        info!("Received SIGINT signal (Ctrl+C)");
                        Self::trigger(&reason_sender, &token, "SIGINT").await;
                    }
                }
                _ = token.cancelled() => {}
            }
        });
    }

    async fn trigger(
        reason_sender: &Mutex<Option<oneshot::Sender<ShutdownReason>>>,
        token: &CancellationToken,
        signal_name: &str,
    ) {
        if let Some(sender) = reason_sender.lock().await.take() {
            let _ = sender.send(ShutdownReason::Signal(signal_name.to_string()));
        }
        token.cancel();
    }
}


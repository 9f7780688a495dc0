use crate::{
    config::ServerConfig,
    error::{McControlError, Result, ServerError},
    status::StatusAggregator,
    toggle::ToggleReconciler,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers::{api_toggle_handler, legacy_toggle_handler, status_handler};

/// Shared state for the Axum server
#[derive(Clone)]
pub struct ServerState {
    pub(crate) reconciler: Arc<ToggleReconciler>,
    pub(crate) aggregator: Arc<StatusAggregator>,
    pub(crate) static_dir: Arc<PathBuf>,
    pub(crate) redirect_url: Arc<str>,
}

/// HTTP front end for the dashboard
pub struct DashboardServer {
    pub(crate) config: ServerConfig,
    pub(crate) state: ServerState,
}

impl DashboardServer {
    pub fn new(
        config: ServerConfig,
        reconciler: Arc<ToggleReconciler>,
        aggregator: Arc<StatusAggregator>,
    ) -> Self {
        let state = ServerState {
            reconciler,
            aggregator,
            static_dir: Arc::new(PathBuf::from(&config.static_dir)),
            redirect_url: Arc::from(config.redirect_url.trim_end_matches('?')),
        };

        Self { config, state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route_service("/", ServeFile::new(self.state.static_dir.join("index.html")))
            .route("/toggle_mc", get(legacy_toggle_handler))
            .route("/api/toggle", post(api_toggle_handler))
            .route("/status", get(status_handler))
            .nest_service("/static", ServeDir::new(self.state.static_dir.as_path()))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` is cancelled
    pub async fn start(&self, shutdown: CancellationToken) -> Result<()> {
        let addr = format!("{}:{}", self.config.ip, self.config.port);

        info!("Starting dashboard server on {}", addr);

        let listener =
            tokio::net::TcpListener::bind(&addr)
                .await
                .map_err(|e| ServerError::BindFailed {
                    address: addr.clone(),
                    source: e,
                })?;

        info!("Dashboard listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| ServerError::Serve {
                details: e.to_string(),
            })?;

        info!("Dashboard server stopped");
        Ok(())
    }
}

/// Builder for [`DashboardServer`]
pub struct DashboardServerBuilder {
    config: Option<ServerConfig>,
    reconciler: Option<Arc<ToggleReconciler>>,
    aggregator: Option<Arc<StatusAggregator>>,
}

impl DashboardServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            reconciler: None,
            aggregator: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn reconciler(mut self, reconciler: Arc<ToggleReconciler>) -> Self {
        self.reconciler = Some(reconciler);
        self
    }

    pub fn aggregator(mut self, aggregator: Arc<StatusAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    pub fn build(self) -> Result<DashboardServer> {
        let config = self
            .config
            .ok_or_else(|| McControlError::system("Server configuration is required"))?;

        let reconciler = self
            .reconciler
            .ok_or_else(|| McControlError::system("Toggle reconciler is required"))?;

        let aggregator = self
            .aggregator
            .ok_or_else(|| McControlError::system("Status aggregator is required"))?;

        Ok(DashboardServer::new(config, reconciler, aggregator))
    }
}

impl Default for DashboardServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

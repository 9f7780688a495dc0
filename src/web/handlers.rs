use crate::error::ControlError;
use crate::toggle::ToggleAction;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::server::ServerState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub result: &'static str,
    pub action: ToggleAction,
    pub container_status: String,
}

/// Maps control failures onto `{detail}` JSON error responses
pub struct ApiError(ControlError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            ControlError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "container not found".to_string())
            }
            ControlError::Runtime { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Legacy toggle kept for bookmarked dashboard links; always redirects
pub async fn legacy_toggle_handler(State(state): State<ServerState>) -> Redirect {
    match state.reconciler.flip().await {
        Ok(action) => {
            info!("Legacy toggle issued: {}", action);
            Redirect::temporary(&state.redirect_url)
        }
        Err(e) => {
            warn!("Legacy toggle failed: {}", e);
            let target = format!(
                "{}?error={}",
                state.redirect_url,
                urlencoding::encode(&e.to_string())
            );
            Redirect::temporary(&target)
        }
    }
}

/// JSON toggle used by the dashboard page
pub async fn api_toggle_handler(
    State(state): State<ServerState>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let outcome = state.reconciler.toggle().await.map_err(|e| {
        error!("Toggle failed: {}", e);
        ApiError(e)
    })?;

    Ok(Json(ToggleResponse {
        result: "ok",
        action: outcome.action,
        container_status: outcome.settled_status.to_string(),
    }))
}

/// Composite container and reachability status
pub async fn status_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.aggregator.build_status_report().await)
}

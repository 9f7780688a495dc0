use super::*;
use crate::config::ServerConfig;
use crate::error::ControlError;
use crate::probe::TcpProber;
use crate::resolver::AddressResolver;
use crate::runtime::{ContainerFacade, MockOperation, MockRuntime};
use crate::status::StatusAggregator;
use crate::toggle::{SettleStrategy, ToggleReconciler};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const WORKLOAD: &str = "mccontrol-test-workload.invalid";
const REDIRECT_URL: &str = "https://dash.example.org";

fn server_config(static_dir: &str) -> ServerConfig {
    ServerConfig {
        ip: "127.0.0.1".to_string(),
        port: 0,
        static_dir: static_dir.to_string(),
        redirect_url: REDIRECT_URL.to_string(),
    }
}

fn test_server(runtime: &MockRuntime, static_dir: &str, service_port: u16) -> DashboardServer {
    let facade = ContainerFacade::new(Arc::new(runtime.clone()), WORKLOAD);
    let reconciler = ToggleReconciler::new(facade.clone(), SettleStrategy::Fixed(Duration::ZERO));
    let resolver = AddressResolver::new(facade.clone(), Arc::new(TcpProber));
    let aggregator =
        StatusAggregator::new(facade, resolver, service_port, Duration::from_millis(300));

    DashboardServerBuilder::new()
        .config(server_config(static_dir))
        .reconciler(Arc::new(reconciler))
        .aggregator(Arc::new(aggregator))
        .build()
        .unwrap()
}

async fn send(server: &DashboardServer, method: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    server.router().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_api_toggle_starts_stopped_workload() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "exited");
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "POST", "/api/toggle").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "result": "ok",
            "action": "started",
            "container_status": "running",
        })
    );
}

#[tokio::test]
async fn test_api_toggle_missing_workload_is_404() {
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "POST", "/api/toggle").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "detail": "container not found" })
    );
    assert_eq!(runtime.call_count(MockOperation::Start), 0);
}

#[tokio::test]
async fn test_api_toggle_runtime_failure_is_500() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "running");
    runtime.fail(
        MockOperation::Stop,
        ControlError::runtime("tried to kill container, but did not receive an exit event"),
    );
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "POST", "/api/toggle").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["detail"],
        "tried to kill container, but did not receive an exit event"
    );
}

#[tokio::test]
async fn test_api_toggle_rejects_get() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "running");
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "GET", "/api/toggle").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(runtime.call_count(MockOperation::Stop), 0);
}

#[tokio::test]
async fn test_legacy_toggle_redirects() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "running");
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "GET", "/toggle_mc").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), REDIRECT_URL);
    assert_eq!(runtime.call_count(MockOperation::Stop), 1);
}

#[tokio::test]
async fn test_legacy_toggle_error_goes_into_query() {
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, "static", 25565);

    let response = send(&server, "GET", "/toggle_mc").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        format!(
            "{}?error=container%20not%20found%3A%20{}",
            REDIRECT_URL, WORKLOAD
        )
    );
}

#[tokio::test]
async fn test_status_endpoint_degrades_fields() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "stopped");
    let port = closed_port().await;
    let server = test_server(&runtime, "static", port);

    let response = send(&server, "GET", "/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["container_status"], "stopped");
    assert_eq!(body["minecraft_online"], false);
    assert_eq!(body["mc_target"], WORKLOAD);
    assert!(body["health"].is_null());
    let diagnostic = body["mc_last_error"].as_str().unwrap();
    assert!(diagnostic.starts_with(WORKLOAD));
    assert!(diagnostic.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_status_endpoint_omits_health_when_runtime_fails() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "running");
    runtime.fail(
        MockOperation::Inspect,
        ControlError::runtime("Docker daemon unavailable"),
    );
    let port = closed_port().await;
    let server = test_server(&runtime, "static", port);

    let response = send(&server, "GET", "/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["container_error"], "Docker daemon unavailable");
    assert!(body.get("container_status").is_none());
    assert!(body.get("health").is_none());
    assert_eq!(body["minecraft_online"], false);
}

#[tokio::test]
async fn test_status_endpoint_with_runtime_down() {
    let runtime = MockRuntime::new();
    runtime.fail(
        MockOperation::Inspect,
        ControlError::runtime("error trying to connect"),
    );
    let port = closed_port().await;
    let server = test_server(&runtime, "static", port);

    let response = send(&server, "GET", "/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("container_status").is_none());
    assert_eq!(body["container_error"], "error trying to connect");
    assert_eq!(body["minecraft_online"], false);
}

#[tokio::test]
async fn test_index_served_from_static_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>mccontrol</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, dir.path().to_str().unwrap(), 25565);

    let response = send(&server, "GET", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"<h1>mccontrol</h1>");

    let response = send(&server, "GET", "/static/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_bytes_served_verbatim() {
    let dir = TempDir::new().unwrap();
    let page: &[u8] = b"<p>caf\xe9</p>";
    std::fs::write(dir.path().join("index.html"), page).unwrap();
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, dir.path().to_str().unwrap(), 25565);

    let response = send(&server, "GET", "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], page);
}

#[tokio::test]
async fn test_missing_index_is_404() {
    let dir = TempDir::new().unwrap();
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, dir.path().to_str().unwrap(), 25565);

    let response = send(&server, "GET", "/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_builder_validation() {
    let runtime = MockRuntime::new();
    let facade = ContainerFacade::new(Arc::new(runtime), WORKLOAD);
    let reconciler = Arc::new(ToggleReconciler::new(
        facade.clone(),
        SettleStrategy::default(),
    ));

    let result = DashboardServerBuilder::new()
        .config(server_config("static"))
        .reconciler(reconciler)
        .build();
    assert!(result.is_err());

    let resolver = AddressResolver::new(facade.clone(), Arc::new(TcpProber));
    let aggregator = Arc::new(StatusAggregator::new(
        facade,
        resolver,
        25565,
        Duration::from_secs(1),
    ));
    let result = DashboardServerBuilder::new()
        .config(server_config("static"))
        .aggregator(aggregator)
        .build();
    assert!(result.is_err());
}

#[tokio::test]
async fn test_server_shuts_down_on_cancel() {
    let runtime = MockRuntime::new();
    let server = test_server(&runtime, "static", 25565);
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), server.start(token)).await;

    assert!(result.unwrap().is_ok());
}

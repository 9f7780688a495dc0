use super::*;
use crate::error::ControlError;
use crate::probe::TcpProber;
use crate::resolver::AddressResolver;
use crate::runtime::{ContainerFacade, MockOperation, MockRuntime};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Aggregator probing the real network; the workload name is deliberately unresolvable
fn aggregator(runtime: &MockRuntime, name: &str, port: u16) -> StatusAggregator {
    let facade = ContainerFacade::new(Arc::new(runtime.clone()), name);
    let resolver = AddressResolver::new(facade.clone(), Arc::new(TcpProber));
    StatusAggregator::new(facade, resolver, port, Duration::from_millis(300))
}

const WORKLOAD: &str = "mccontrol-test-workload.invalid";

#[tokio::test]
async fn test_stopped_workload_without_listener() {
    let runtime = MockRuntime::new()
        .with_workload(WORKLOAD, "stopped")
        .with_network("bridge", Some("127.0.0.2"));
    let port = closed_port().await;

    let report = aggregator(&runtime, WORKLOAD, port)
        .build_status_report()
        .await;

    assert_eq!(report.container_status.as_deref(), Some("stopped"));
    assert!(!report.minecraft_online);
    assert_eq!(report.mc_target.as_deref(), Some(WORKLOAD));
    let diagnostic = report.mc_last_error.unwrap();
    assert!(diagnostic.contains(WORKLOAD));
    assert!(diagnostic.contains("127.0.0.2"));
    assert!(diagnostic.contains("127.0.0.1"));
    assert_eq!(diagnostic.split("; ").count(), 3);
}

#[tokio::test]
async fn test_missing_workload_still_reports() {
    let runtime = MockRuntime::new();
    let port = closed_port().await;

    let report = aggregator(&runtime, WORKLOAD, port)
        .build_status_report()
        .await;

    assert_eq!(report.container_status.as_deref(), Some("not_found"));
    assert!(report.health.is_none());
    assert!(report.container_error.is_none());
    assert!(!report.minecraft_online);
    assert_eq!(report.mc_target.as_deref(), Some(WORKLOAD));
}

#[tokio::test]
async fn test_runtime_failure_recorded_as_field() {
    let runtime = MockRuntime::new().with_workload(WORKLOAD, "running");
    runtime.fail(
        MockOperation::Inspect,
        ControlError::runtime("error trying to connect: No such file or directory"),
    );
    let port = closed_port().await;

    let report = aggregator(&runtime, WORKLOAD, port)
        .build_status_report()
        .await;

    assert!(report.container_status.is_none());
    assert_eq!(
        report.container_error.as_deref(),
        Some("error trying to connect: No such file or directory")
    );
    assert!(!report.minecraft_online);
}

#[tokio::test]
async fn test_running_workload_reachable_on_loopback() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let runtime = MockRuntime::new()
        .with_workload(WORKLOAD, "running")
        .with_health("healthy");

    let report = aggregator(&runtime, WORKLOAD, port)
        .build_status_report()
        .await;

    assert_eq!(report.container_status.as_deref(), Some("running"));
    assert_eq!(report.health.as_deref(), Some("healthy"));
    assert!(report.minecraft_online);
    assert_eq!(report.mc_target.as_deref(), Some("127.0.0.1"));
    assert!(report.mc_last_error.is_none());
}

#[test]
fn test_report_serialization_omits_absent_fields() {
    let report = StatusReport {
        container_status: Some("running".to_string()),
        health: None,
        container_error: None,
        minecraft_online: true,
        mc_target: Some("minecraft".to_string()),
        mc_last_error: None,
    };

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "container_status": "running",
            "health": null,
            "minecraft_online": true,
            "mc_target": "minecraft",
        })
    );
}

#[test]
fn test_report_serialization_drops_health_on_runtime_error() {
    let report = StatusReport {
        container_status: None,
        health: None,
        container_error: Some("Docker daemon unavailable".to_string()),
        minecraft_online: false,
        mc_target: Some("minecraft".to_string()),
        mc_last_error: Some("minecraft: refused".to_string()),
    };

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "container_error": "Docker daemon unavailable",
            "minecraft_online": false,
            "mc_target": "minecraft",
            "mc_last_error": "minecraft: refused",
        })
    );
}

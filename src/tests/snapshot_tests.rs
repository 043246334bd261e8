//! Tests for the host's serializable diagnostics view

use std::sync::Arc;

use serde_json::json;

use crate::connection::ConnectionHandle;
use crate::host::{ Host, HostSnapshot };
use crate::services::TimeService;

fn host_with_two_services() -> Host {
    let host = Host::new();
    host.register_service(TimeService::NAME, TimeService::new).unwrap();
    host.register_service("alarm", TimeService::new).unwrap();
    host
}

#[test]
fn empty_host_serializes_to_an_empty_list() {
    let host = Host::new();

    let value = serde_json::to_value(host.snapshot()).unwrap();
    assert_eq!(value, json!({ "services": [] }));
}

#[test]
fn snapshot_rows_are_sorted_with_live_counts() {
    let host = host_with_two_services();
    let first = Arc::new(ConnectionHandle::new());
    let second = Arc::new(ConnectionHandle::new());
    let _a = host.bind_service(TimeService::NAME, first).unwrap();
    let _b = host.bind_service(TimeService::NAME, second).unwrap();

    let value = serde_json::to_value(host.snapshot()).unwrap();
    assert_eq!(
        value,
        json!({
            "services": [
                { "name": "alarm", "running": false, "bind_count": 0 },
                { "name": "time", "running": true, "bind_count": 2 }
            ]
        })
    );
}

#[test]
fn snapshot_tracks_teardown() {
    let host = host_with_two_services();
    let handle = Arc::new(ConnectionHandle::new());
    let binding = host.bind_service(TimeService::NAME, handle).unwrap();
    binding.unbind().unwrap();

    let value = serde_json::to_value(host.snapshot()).unwrap();
    assert_eq!(value["services"][1]["name"], json!("time"));
    assert_eq!(value["services"][1]["running"], json!(false));
    assert_eq!(value["services"][1]["bind_count"], json!(0));
}

#[test]
fn snapshot_round_trips_for_diagnostics() {
    let host = host_with_two_services();
    let handle = Arc::new(ConnectionHandle::new());
    let _binding = host.bind_service("alarm", handle).unwrap();

    let snapshot = host.snapshot();
    let value = serde_json::to_value(&snapshot).unwrap();
    let parsed: HostSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn debug_output_carries_the_snapshot() {
    let host = host_with_two_services();

    let rendered = format!("{:?}", host);
    assert!(rendered.contains("alarm"));
    assert!(rendered.contains("time"));
}

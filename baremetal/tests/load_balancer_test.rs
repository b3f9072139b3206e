//! Load balancer backends and backend sets driven through work requests

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

mod common;

use baremetal::api::models::{Backend, BackendSet, HealthChecker, WorkRequestState};
use baremetal::api::testing::FakeClient;
use common::{config, host, list_len, number, string};
use serde_json::json;
use std::sync::Arc;
use tfplug::{Context, TfplugError};

const BACKEND: &str = "baremetal_load_balancer_backend";
const BACKEND_SET: &str = "baremetal_load_balancer_backendset";
const LB: &str = "ocid1.loadbalancer.oc1..lb";

fn backend_config() -> serde_json::Value {
    json!({
        "load_balancer_id": LB,
        "backendset_name": "web",
        "name": "10.0.0.3:80",
        "ip_address": "10.0.0.3",
        "port": 80,
        "weight": 1,
    })
}

fn detail(err: TfplugError) -> String {
    match err {
        TfplugError::Diagnostics(diags) => diags[0].detail.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn backend_create_follows_its_work_request() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let state = host
        .create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap();

    assert_eq!(string(&state, "id"), "10.0.0.3:80");
    assert_eq!(number(&state, "weight"), 1.0);
    assert_eq!(string(&state, "state"), "SUCCEEDED");
    assert_eq!(
        client.calls(),
        ["create_backend", "get_work_request", "get_work_request", "get_backend"]
    );
    assert!(client.backend(LB, "web", "10.0.0.3:80").is_some());
}

#[tokio::test]
async fn work_request_succeeding_on_third_fetch() {
    let client = Arc::new(FakeClient::new());
    client.script_next_work_requests(&[
        WorkRequestState::Accepted,
        WorkRequestState::InProgress,
        WorkRequestState::Succeeded,
    ]);
    let host = host(client.clone()).await;

    host.create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap();

    assert_eq!(client.call_count("get_work_request"), 3);
    assert_eq!(client.call_count("get_backend"), 1);
}

#[tokio::test]
async fn failed_work_request_stops_polling() {
    let client = Arc::new(FakeClient::new());
    client.script_next_work_requests(&[
        WorkRequestState::Accepted,
        WorkRequestState::Failed,
        WorkRequestState::Succeeded,
    ]);
    let host = host(client.clone()).await;

    let err = host
        .create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap_err();

    assert!(detail(err).contains("work request wr-1 failed"));
    assert_eq!(client.call_count("get_work_request"), 2);
    assert_eq!(client.call_count("get_backend"), 0);
}

#[tokio::test]
async fn backend_update_sends_desired_settings() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let prior = host
        .create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap();

    let mut desired = backend_config();
    desired["weight"] = json!(3);
    desired["drain"] = json!(true);
    let state = host
        .update(Context::new(), BACKEND, prior, config(desired))
        .await
        .unwrap();

    assert_eq!(string(&state, "id"), "10.0.0.3:80");
    assert_eq!(number(&state, "weight"), 3.0);
    let backend = client.backend(LB, "web", "10.0.0.3:80").unwrap();
    assert_eq!(backend.weight, 3);
    assert!(backend.drain);
}

#[tokio::test]
async fn missing_backend_leaves_state() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let mut current = backend_config();
    current["id"] = json!("10.0.0.3:80");
    let refreshed = host
        .read(Context::new(), BACKEND, config(current))
        .await
        .unwrap();

    assert!(refreshed.is_none());
}

#[tokio::test]
async fn deleting_twice_is_not_an_error() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let state = host
        .create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap();
    host.delete(Context::new(), BACKEND, state.clone())
        .await
        .unwrap();
    assert!(client.backend(LB, "web", "10.0.0.3:80").is_none());

    host.delete(Context::new(), BACKEND, state).await.unwrap();
    assert_eq!(client.call_count("delete_backend"), 2);
}

#[tokio::test]
async fn concurrent_backends_track_their_own_work_requests() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let creates = (1..=4).map(|n| {
        let mut desired = backend_config();
        desired["name"] = json!(format!("10.0.0.{n}:80"));
        desired["ip_address"] = json!(format!("10.0.0.{n}"));
        host.create(Context::new(), BACKEND, config(desired))
    });
    let states = futures::future::join_all(creates).await;

    let mut ids: Vec<String> = states
        .into_iter()
        .map(|state| string(&state.unwrap(), "id"))
        .collect();
    ids.sort();
    assert_eq!(
        ids,
        ["10.0.0.1:80", "10.0.0.2:80", "10.0.0.3:80", "10.0.0.4:80"]
    );
    assert_eq!(client.call_count("create_backend"), 4);
    assert_eq!(client.call_count("get_work_request"), 8);
}

fn backend_set_config() -> serde_json::Value {
    json!({
        "load_balancer_id": LB,
        "name": "web",
        "policy": "ROUND_ROBIN",
        "health_checker": [{
            "protocol": "HTTP",
            "url_path": "/healthz",
            "port": 8080,
            "response_body_regex": "^ok$",
        }],
    })
}

#[tokio::test]
async fn backend_set_lists_its_backends() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let state = host
        .create(Context::new(), BACKEND_SET, config(backend_set_config()))
        .await
        .unwrap();
    assert_eq!(string(&state, "id"), "web");
    assert_eq!(number(&state, "health_checker.0.interval_ms"), 30000.0);
    assert_eq!(string(&state, "state"), "SUCCEEDED");
    assert_eq!(list_len(&state, "backend"), 0);

    host.create(Context::new(), BACKEND, config(backend_config()))
        .await
        .unwrap();
    let refreshed = host
        .read(Context::new(), BACKEND_SET, state)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(list_len(&refreshed, "backend"), 1);
    assert_eq!(string(&refreshed, "backend.0.ip_address"), "10.0.0.3");
}

#[tokio::test]
async fn backend_set_update_keeps_registered_backends() {
    let client = Arc::new(FakeClient::new());
    client.insert_backend_set(
        LB,
        BackendSet {
            name: "web".to_string(),
            policy: "ROUND_ROBIN".to_string(),
            backends: vec![Backend {
                name: "10.0.0.4:80".to_string(),
                ip_address: "10.0.0.4".to_string(),
                port: 80,
                weight: 1,
                ..Default::default()
            }],
            health_checker: HealthChecker {
                protocol: "HTTP".to_string(),
                url_path: "/healthz".to_string(),
                port: 8080,
                ..Default::default()
            },
            ssl_configuration: None,
        },
    );
    let host = host(client.clone()).await;

    let mut current = backend_set_config();
    current["id"] = json!("web");
    let prior = host
        .read(Context::new(), BACKEND_SET, config(current))
        .await
        .unwrap()
        .unwrap();

    let mut desired = backend_set_config();
    desired["policy"] = json!("LEAST_CONNECTIONS");
    let state = host
        .update(Context::new(), BACKEND_SET, prior, config(desired))
        .await
        .unwrap();

    assert_eq!(string(&state, "policy"), "LEAST_CONNECTIONS");
    assert_eq!(list_len(&state, "backend"), 1);
    assert_eq!(string(&state, "state"), "SUCCEEDED");
    assert!(client.backend(LB, "web", "10.0.0.4:80").is_some());
}

#[tokio::test]
async fn invalid_backend_set_is_rejected_before_any_call() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let mut desired = backend_set_config();
    desired["policy"] = json!("RANDOM");
    let err = host
        .create(Context::new(), BACKEND_SET, config(desired))
        .await
        .unwrap_err();

    assert!(matches!(err, TfplugError::Diagnostics(_)));
    assert!(client.calls().is_empty());
}

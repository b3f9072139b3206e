#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

mod common;

use baremetal::api::testing::FakeClient;
use common::{config, host, number, string};
use serde_json::json;
use std::sync::Arc;
use tfplug::{AttributePath, Context, TfplugError};

const BUCKET: &str = "baremetal_objectstorage_bucket";
const OBJECT: &str = "baremetal_objectstorage_object";

fn bucket_config() -> serde_json::Value {
    json!({
        "compartment_id": "ocid1.compartment.oc1..store",
        "name": "artifacts",
        "namespace": "acme",
        "metadata": {"team": "infra"},
    })
}

fn object_config(content: &str) -> serde_json::Value {
    json!({
        "namespace": "acme",
        "bucket": "artifacts",
        "object": "releases/v1.txt",
        "content": content,
    })
}

#[tokio::test]
async fn bucket_lifecycle() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let state = host
        .create(Context::new(), BUCKET, config(bucket_config()))
        .await
        .unwrap();
    assert_eq!(string(&state, "id"), "acme/artifacts");
    assert_eq!(string(&state, "created_by"), "ocid1.user.fake");
    assert_eq!(string(&state, "metadata.team"), "infra");

    let mut desired = bucket_config();
    desired["metadata"] = json!({"team": "platform", "tier": "gold"});
    let state = host
        .update(Context::new(), BUCKET, state, config(desired))
        .await
        .unwrap();
    assert_eq!(string(&state, "id"), "acme/artifacts");
    assert_eq!(
        client
            .bucket("acme", "artifacts")
            .unwrap()
            .metadata
            .get("tier"),
        Some(&"gold".to_string())
    );

    host.delete(Context::new(), BUCKET, state.clone())
        .await
        .unwrap();
    assert!(client.bucket("acme", "artifacts").is_none());
    assert_eq!(
        host.read(Context::new(), BUCKET, state).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn duplicate_bucket_reports_the_service_error() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    host.create(Context::new(), BUCKET, config(bucket_config()))
        .await
        .unwrap();
    let err = host
        .create(Context::new(), BUCKET, config(bucket_config()))
        .await
        .unwrap_err();

    let TfplugError::Diagnostics(diags) = err else {
        panic!("expected diagnostics");
    };
    assert_eq!(
        diags[0].summary,
        "Failed to create baremetal_objectstorage_bucket"
    );
    assert!(diags[0].detail.contains("BucketAlreadyExists"));
}

#[tokio::test]
async fn object_is_rewritten_on_update() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let state = host
        .create(Context::new(), OBJECT, config(object_config("one")))
        .await
        .unwrap();
    assert_eq!(
        string(&state, "id"),
        "tfobm-object-acme/artifacts/releases/v1.txt"
    );

    let state = host
        .update(Context::new(), OBJECT, state, config(object_config("two")))
        .await
        .unwrap();

    assert_eq!(string(&state, "content"), "two");
    assert_eq!(
        client
            .object("acme", "artifacts", "releases/v1.txt")
            .unwrap()
            .content,
        "two"
    );
    assert_eq!(client.call_count("put_object"), 2);
}

#[tokio::test]
async fn object_import_resolves_location_from_id() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;
    host.create(Context::new(), OBJECT, config(object_config("payload")))
        .await
        .unwrap();

    let imported = host
        .import(
            Context::new(),
            OBJECT,
            "tfobm-object-acme/artifacts/releases/v1.txt",
        )
        .await
        .unwrap();

    assert_eq!(imported.len(), 1);
    assert_eq!(string(&imported[0], "namespace"), "acme");
    assert_eq!(string(&imported[0], "bucket"), "artifacts");
    assert_eq!(string(&imported[0], "object"), "releases/v1.txt");
    assert_eq!(string(&imported[0], "content"), "payload");
}

#[tokio::test]
async fn importing_a_missing_object_fails() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let err = host
        .import(Context::new(), OBJECT, "tfobm-object-acme/artifacts/absent")
        .await
        .unwrap_err();

    assert!(matches!(err, TfplugError::ImportFailed(_)));
}

#[tokio::test]
async fn buckets_cannot_be_imported() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let err = host
        .import(Context::new(), BUCKET, "acme/artifacts")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("does not support import"));
}

#[tokio::test]
async fn namespace_data_source() {
    let client = Arc::new(FakeClient::new());
    client.set_namespace("acme");
    let host = host(client.clone()).await;

    let state = host
        .read_data_source(
            Context::new(),
            "baremetal_objectstorage_namespace",
            config(json!({})),
        )
        .await
        .unwrap();

    assert_eq!(string(&state, "namespace"), "acme");
    assert!(state.get_string(&AttributePath::new("id")).is_ok());
}

#[tokio::test]
async fn object_head_reports_size_and_metadata() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;
    let mut object = object_config("0123456789");
    object["metadata"] = json!({"checksum": "abc"});
    host.create(Context::new(), OBJECT, config(object))
        .await
        .unwrap();

    let state = host
        .read_data_source(
            Context::new(),
            "baremetal_objectstorage_object_head",
            config(json!({
                "namespace": "acme",
                "bucket": "artifacts",
                "object": "releases/v1.txt",
            })),
        )
        .await
        .unwrap();

    assert_eq!(number(&state, "content_length"), 10.0);
    assert_eq!(string(&state, "content_type"), "application/octet-stream");
    assert_eq!(string(&state, "metadata.checksum"), "abc");
}

#[tokio::test]
async fn object_head_of_missing_object_fails() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let err = host
        .read_data_source(
            Context::new(),
            "baremetal_objectstorage_object_head",
            config(json!({"namespace": "acme", "bucket": "artifacts", "object": "nope"})),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("ObjectNotFound"));
}

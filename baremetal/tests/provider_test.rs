#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

mod common;

use baremetal::api::testing::FakeClient;
use baremetal::api::{ApiError, BareMetalClient};
use baremetal::config::{self, ProviderConfig};
use baremetal::BareMetalProvider;
use serde_json::json;
use serial_test::serial;
use std::sync::{Arc, Mutex};
use tfplug::{Context, DynamicValue, ProviderHost, TfplugError};

const ATTRIBUTES: [&str; 7] = [
    config::TENANCY_OCID,
    config::USER_OCID,
    config::FINGERPRINT,
    config::PRIVATE_KEY_PATH,
    config::PRIVATE_KEY,
    config::PRIVATE_KEY_PASSWORD,
    config::REGION,
];

fn clear_env() {
    for attribute in ATTRIBUTES {
        std::env::remove_var(config::env_var_name(attribute));
    }
}

/// A provider whose factory records the configuration it was handed
fn recording_provider() -> (BareMetalProvider, Arc<Mutex<Option<ProviderConfig>>>) {
    let seen = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let provider = BareMetalProvider::new(Arc::new(
        move |config: &ProviderConfig| -> Result<Arc<dyn BareMetalClient>, ApiError> {
            *recorder.lock().unwrap() = Some(config.clone());
            Ok(Arc::new(FakeClient::new()))
        },
    ));
    (provider, seen)
}

#[tokio::test]
#[serial]
async fn configures_from_environment() {
    clear_env();
    std::env::set_var("OBMCS_TENANCY_OCID", "ocid1.tenancy.oc1..env");
    std::env::set_var("OBMCS_USER_OCID", "ocid1.user.oc1..env");
    std::env::set_var("OBMCS_FINGERPRINT", "aa:bb:cc");
    std::env::set_var("OBMCS_PRIVATE_KEY_PATH", "/home/ops/.oci/key.pem");
    std::env::set_var("OBMCS_REGION", "us-ashburn-1");

    let (provider, seen) = recording_provider();
    let mut host = ProviderHost::new(provider);
    host.configure(Context::new(), DynamicValue::object())
        .await
        .unwrap();
    clear_env();

    assert!(host.is_configured());
    let config = seen.lock().unwrap().clone().unwrap();
    assert_eq!(config.tenancy_ocid, "ocid1.tenancy.oc1..env");
    assert_eq!(
        config.private_key_path.as_deref(),
        Some("/home/ops/.oci/key.pem")
    );
    assert_eq!(
        host.provider().config().map(|c| c.region.as_str()),
        Some("us-ashburn-1")
    );
}

#[tokio::test]
#[serial]
async fn region_defaults_to_phoenix() {
    clear_env();

    let (provider, _) = recording_provider();
    let mut host = ProviderHost::new(provider);
    let mut block = common::provider_block();
    block.remove(config::REGION);
    host.configure(Context::new(), block).await.unwrap();

    assert_eq!(
        host.provider().config().map(|c| c.region.clone()),
        Some(config::DEFAULT_REGION.to_string())
    );
}

#[tokio::test]
#[serial]
async fn missing_configuration_is_reported_per_attribute() {
    clear_env();

    let (provider, seen) = recording_provider();
    let mut host = ProviderHost::new(provider);
    let err = host
        .configure(
            Context::new(),
            DynamicValue::from_json(json!({"tenancy_ocid": "ocid1.tenancy.oc1..t"})),
        )
        .await
        .unwrap_err();

    let TfplugError::Diagnostics(diags) = err else {
        panic!("expected diagnostics");
    };
    let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
    assert_eq!(
        summaries,
        [
            "user_ocid is required",
            "fingerprint is required",
            "No private key configured",
        ]
    );
    assert!(seen.lock().unwrap().is_none());
    assert!(!host.is_configured());
}

#[tokio::test]
#[serial]
async fn client_factory_failure_is_a_diagnostic() {
    clear_env();

    let provider = BareMetalProvider::new(Arc::new(
        |_config: &ProviderConfig| -> Result<Arc<dyn BareMetalClient>, ApiError> {
            Err(ApiError::Authentication("unreadable private key".into()))
        },
    ));
    let mut host = ProviderHost::new(provider);
    let err = host
        .configure(Context::new(), common::provider_block())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to create API client: Authentication failed: unreadable private key"
    );
}

#[tokio::test]
async fn resources_need_a_configured_provider() {
    let host = ProviderHost::new(BareMetalProvider::with_client(Arc::new(FakeClient::new())));

    let err = host
        .read_data_source(
            Context::new(),
            "baremetal_objectstorage_namespace",
            DynamicValue::object(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TfplugError::ProviderNotConfigured));
}

#[tokio::test]
#[serial]
async fn unknown_resource_type() {
    clear_env();
    let host = common::host(Arc::new(FakeClient::new())).await;

    let err = host
        .create(
            Context::new(),
            "baremetal_core_instance",
            DynamicValue::object(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TfplugError::ResourceNotFound(_)));
}

//! Data source reads, including multi-page listings

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

mod common;

use baremetal::api::testing::FakeClient;
use baremetal::api::ApiError;
use common::{config, host, list_len, number, path, string};
use serde_json::{json, Value};
use std::sync::Arc;
use tfplug::{Context, TfplugError};

const COMPARTMENT: &str = "ocid1.compartment.oc1..ds";
const CREATED: &str = "2017-06-01T10:00:00Z";

fn group(n: usize) -> Value {
    json!({
        "id": format!("ocid1.group.oc1..g{n}"),
        "compartmentId": COMPARTMENT,
        "name": format!("group-{n}"),
        "description": "admins",
        "lifecycleState": "ACTIVE",
        "timeCreated": CREATED,
    })
}

fn seeded_groups(count: usize) -> Arc<FakeClient> {
    let client = Arc::new(FakeClient::new());
    client.seed("groups", (1..=count).map(group));
    client
}

async fn read(client: &Arc<FakeClient>, type_name: &str, cfg: Value) -> tfplug::DynamicValue {
    host(client.clone())
        .await
        .read_data_source(Context::new(), type_name, config(cfg))
        .await
        .unwrap()
}

#[tokio::test]
async fn listing_follows_every_page_in_order() {
    let client = seeded_groups(5);
    client.set_page_size(2);

    let state = read(
        &client,
        "baremetal_identity_groups",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;

    assert_eq!(list_len(&state, "groups"), 5);
    for n in 0..5 {
        assert_eq!(
            string(&state, &format!("groups.{n}.name")),
            format!("group-{}", n + 1)
        );
    }
    let pages: Vec<_> = client.list_requests().into_iter().map(|r| r.page).collect();
    assert_eq!(pages, [None, Some("2".to_string()), Some("4".to_string())]);
}

#[tokio::test]
async fn limit_is_forwarded_on_every_page() {
    let client = seeded_groups(3);

    let state = read(
        &client,
        "baremetal_identity_groups",
        json!({"compartment_id": COMPARTMENT, "limit": 2}),
    )
    .await;

    assert_eq!(list_len(&state, "groups"), 3);
    let requests = client.list_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.limit == Some(2)));
}

#[tokio::test]
async fn starting_cursor_skips_earlier_results() {
    let client = seeded_groups(4);

    let state = read(
        &client,
        "baremetal_identity_groups",
        json!({"compartment_id": COMPARTMENT, "page": "2"}),
    )
    .await;

    assert_eq!(list_len(&state, "groups"), 2);
    assert_eq!(string(&state, "groups.0.name"), "group-3");
}

#[tokio::test]
async fn failing_page_fails_the_whole_read() {
    let client = seeded_groups(3);
    client.fail_next(
        "list_groups",
        ApiError::service(500, "InternalServerError", "boom"),
    );
    let host = host(client.clone()).await;

    let err = host
        .read_data_source(
            Context::new(),
            "baremetal_identity_groups",
            config(json!({"compartment_id": COMPARTMENT})),
        )
        .await
        .unwrap_err();

    let TfplugError::Diagnostics(diags) = err else {
        panic!("expected diagnostics");
    };
    assert_eq!(diags[0].summary, "Failed to read baremetal_identity_groups");
    assert!(diags[0].detail.contains("InternalServerError"));
}

#[tokio::test]
async fn malformed_cursor_is_a_service_error() {
    let client = seeded_groups(3);
    let host = host(client.clone()).await;

    let err = host
        .read_data_source(
            Context::new(),
            "baremetal_identity_groups",
            config(json!({"compartment_id": COMPARTMENT, "page": "not-a-cursor"})),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("InvalidParameter"));
}

#[tokio::test]
async fn missing_required_argument_is_rejected() {
    let client = seeded_groups(1);
    let host = host(client.clone()).await;

    let result = host
        .read_data_source(
            Context::new(),
            "baremetal_identity_groups",
            config(json!({})),
        )
        .await;

    assert!(result.is_err());
    assert!(client.list_requests().is_empty());
}

#[tokio::test]
async fn users_and_policies_share_principal_fields() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "users",
        [json!({
            "id": "ocid1.user.oc1..u1",
            "compartmentId": COMPARTMENT,
            "name": "alice",
            "lifecycleState": "INACTIVE",
            "timeCreated": CREATED,
            "inactiveStatus": 4,
        })],
    );
    client.seed(
        "policies",
        [json!({
            "id": "ocid1.policy.oc1..p1",
            "compartmentId": COMPARTMENT,
            "name": "admins",
            "statements": ["Allow group admins to manage all-resources in tenancy"],
            "lifecycleState": "ACTIVE",
            "timeCreated": CREATED,
        })],
    );

    let users = read(
        &client,
        "baremetal_identity_users",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;
    assert_eq!(string(&users, "users.0.name"), "alice");
    assert_eq!(string(&users, "users.0.state"), "INACTIVE");
    assert_eq!(
        users.get_number(&path("users.0.inactive_state")).unwrap(),
        4.0
    );

    let policies = read(
        &client,
        "baremetal_identity_policies",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;
    assert_eq!(list_len(&policies, "policies.0.statements"), 1);
    assert_eq!(string(&policies, "policies.0.description"), "");
}

#[tokio::test]
async fn listings_are_scoped_to_the_compartment() {
    let client = seeded_groups(2);
    let mut foreign = group(9);
    foreign["compartmentId"] = json!("ocid1.compartment.oc1..other");
    client.seed("groups", [foreign]);

    let state = read(
        &client,
        "baremetal_identity_groups",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;

    assert_eq!(list_len(&state, "groups"), 2);
}

#[tokio::test]
async fn availability_domains() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "availability_domains",
        ["Uocm:PHX-AD-1", "Uocm:PHX-AD-2"]
            .map(|name| json!({"name": name, "compartmentId": COMPARTMENT})),
    );

    let state = read(
        &client,
        "baremetal_identity_availability_domains",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;

    assert_eq!(list_len(&state, "availability_domains"), 2);
    assert_eq!(
        string(&state, "availability_domains.1.name"),
        "Uocm:PHX-AD-2"
    );
}

#[tokio::test]
async fn dhcp_options_nest_their_entries() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "dhcp_options",
        [json!({
            "id": "ocid1.dhcpoptions.oc1..d1",
            "compartmentId": COMPARTMENT,
            "displayName": "default",
            "options": [
                {
                    "type": "DomainNameServer",
                    "customDnsServers": [],
                    "serverType": "VcnLocalPlusInternet",
                },
                {"type": "SearchDomain", "searchDomainNames": ["example.com"]},
            ],
            "lifecycleState": "AVAILABLE",
            "timeCreated": CREATED,
            "vcnId": "ocid1.vcn.oc1..v1",
        })],
    );

    let state = read(
        &client,
        "baremetal_core_dhcp_options",
        json!({"compartment_id": COMPARTMENT, "vcn_id": "ocid1.vcn.oc1..v1"}),
    )
    .await;

    assert_eq!(list_len(&state, "options"), 1);
    assert_eq!(list_len(&state, "options.0.options"), 2);
    assert_eq!(
        string(&state, "options.0.options.0.type"),
        "DomainNameServer"
    );
    assert_eq!(
        string(&state, "options.0.options.0.server_type"),
        "VcnLocalPlusInternet"
    );
}

#[tokio::test]
async fn internet_gateways_report_enabled_flag() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "internet_gateways",
        [json!({
            "id": "ocid1.internetgateway.oc1..ig",
            "compartmentId": COMPARTMENT,
            "isEnabled": true,
            "lifecycleState": "AVAILABLE",
            "timeCreated": CREATED,
            "vcnId": "ocid1.vcn.oc1..v1",
        })],
    );

    let state = read(
        &client,
        "baremetal_core_internet_gateways",
        json!({"compartment_id": COMPARTMENT, "vcn_id": "ocid1.vcn.oc1..v1"}),
    )
    .await;

    assert!(state.get_bool(&path("gateways.0.enabled")).unwrap());
    assert_eq!(string(&state, "gateways.0.state"), "AVAILABLE");
}

#[tokio::test]
async fn db_versions() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "db_versions",
        ["11.2.0.4", "12.1.0.2", "12.2.0.1"].map(|v| json!({"version": v})),
    );
    client.set_page_size(1);

    let state = read(
        &client,
        "baremetal_database_db_versions",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;

    assert_eq!(list_len(&state, "db_versions"), 3);
    assert_eq!(string(&state, "db_versions.2.version"), "12.2.0.1");
    assert_eq!(client.list_requests().len(), 3);
}

#[tokio::test]
async fn vnic_attachments_filter_by_instance() {
    let client = Arc::new(FakeClient::new());
    let attachment = |n: usize, instance: &str| {
        json!({
            "id": format!("ocid1.vnicattachment.oc1..a{n}"),
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": COMPARTMENT,
            "instanceId": instance,
            "lifecycleState": "ATTACHED",
            "subnetId": "ocid1.subnet.oc1..s1",
            "timeCreated": CREATED,
            "vnicId": format!("ocid1.vnic.oc1..v{n}"),
        })
    };
    client.seed(
        "vnic_attachments",
        [
            attachment(1, "ocid1.instance.oc1..web"),
            attachment(2, "ocid1.instance.oc1..db"),
        ],
    );

    let state = read(
        &client,
        "baremetal_core_vnic_attachments",
        json!({"compartment_id": COMPARTMENT, "instance_id": "ocid1.instance.oc1..db"}),
    )
    .await;

    assert_eq!(list_len(&state, "vnic_attachments"), 1);
    assert_eq!(
        string(&state, "vnic_attachments.0.vnic_id"),
        "ocid1.vnic.oc1..v2"
    );
    assert_eq!(string(&state, "vnic_attachments.0.state"), "ATTACHED");
}

#[tokio::test]
async fn volume_backups_report_their_size() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "volume_backups",
        [json!({
            "id": "ocid1.volumebackup.oc1..b1",
            "compartmentId": COMPARTMENT,
            "displayName": "nightly",
            "lifecycleState": "AVAILABLE",
            "sizeInMbs": 51200,
            "timeCreated": CREATED,
            "volumeId": "ocid1.volume.oc1..vol",
        })],
    );

    let state = read(
        &client,
        "baremetal_core_volume_backups",
        json!({"compartment_id": COMPARTMENT, "volume_id": "ocid1.volume.oc1..vol"}),
    )
    .await;

    assert_eq!(list_len(&state, "volume_backups"), 1);
    assert_eq!(number(&state, "volume_backups.0.size_in_mbs"), 51200.0);
    assert_eq!(string(&state, "volume_backups.0.display_name"), "nightly");
}

#[tokio::test]
async fn ipsec_status_lists_tunnels() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "ipsec_status",
        [json!({
            "id": "ocid1.ipsecconnection.oc1..c1",
            "compartmentId": COMPARTMENT,
            "timeCreated": CREATED,
            "tunnels": [
                {
                    "ipAddress": "129.146.1.1",
                    "lifecycleState": "UP",
                    "timeCreated": CREATED,
                    "timeStateModified": CREATED,
                },
                {
                    "ipAddress": "129.146.1.2",
                    "lifecycleState": "DOWN",
                    "timeCreated": CREATED,
                    "timeStateModified": CREATED,
                },
            ],
        })],
    );

    let state = read(
        &client,
        "baremetal_core_ipsec_status",
        json!({"ipsec_id": "ocid1.ipsecconnection.oc1..c1"}),
    )
    .await;

    assert_eq!(string(&state, "id"), "ocid1.ipsecconnection.oc1..c1");
    assert_eq!(list_len(&state, "tunnels"), 2);
    assert_eq!(string(&state, "tunnels.1.state"), "DOWN");
    assert!(client.list_requests().is_empty());
}

#[tokio::test]
async fn unknown_ipsec_connection_is_an_error() {
    let client = Arc::new(FakeClient::new());
    let host = host(client.clone()).await;

    let err = host
        .read_data_source(
            Context::new(),
            "baremetal_core_ipsec_status",
            config(json!({"ipsec_id": "ocid1.ipsecconnection.oc1..missing"})),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn single_database_and_db_home() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "databases",
        [json!({
            "id": "ocid1.database.oc1..d1",
            "compartmentId": COMPARTMENT,
            "dbHomeId": "ocid1.dbhome.oc1..h1",
            "dbName": "orcl",
            "dbUniqueName": "orcl_phx",
            "lifecycleState": "AVAILABLE",
            "timeCreated": CREATED,
        })],
    );
    client.seed(
        "db_homes",
        [json!({
            "id": "ocid1.dbhome.oc1..h1",
            "compartmentId": COMPARTMENT,
            "dbSystemId": "ocid1.dbsystem.oc1..s1",
            "dbVersion": "12.1.0.2",
            "lifecycleState": "AVAILABLE",
            "timeCreated": CREATED,
        })],
    );

    let database = read(
        &client,
        "baremetal_database_database",
        json!({"database_id": "ocid1.database.oc1..d1"}),
    )
    .await;
    assert_eq!(string(&database, "id"), "ocid1.database.oc1..d1");
    assert_eq!(string(&database, "db_unique_name"), "orcl_phx");

    let home = read(
        &client,
        "baremetal_database_db_home",
        json!({"db_home_id": string(&database, "db_home_id")}),
    )
    .await;
    assert_eq!(string(&home, "db_system_id"), "ocid1.dbsystem.oc1..s1");
    assert_eq!(string(&home, "db_version"), "12.1.0.2");
    assert_eq!(string(&home, "display_name"), "");
}

#[tokio::test]
async fn db_systems_in_compartment() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "db_systems",
        [json!({
            "id": "ocid1.dbsystem.oc1..s1",
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": COMPARTMENT,
            "shape": "BM.DenseIO1.36",
            "subnetId": "ocid1.subnet.oc1..s1",
            "sshPublicKeys": ["ssh-rsa AAAA one", "ssh-rsa AAAA two"],
            "cpuCoreCount": 4,
            "listenerPort": 1521,
            "lifecycleState": "AVAILABLE",
            "timeCreated": CREATED,
        })],
    );

    let state = read(
        &client,
        "baremetal_database_db_systems",
        json!({"compartment_id": COMPARTMENT}),
    )
    .await;

    assert_eq!(list_len(&state, "db_systems"), 1);
    assert_eq!(number(&state, "db_systems.0.cpu_core_count"), 4.0);
    assert_eq!(number(&state, "db_systems.0.listener_port"), 1521.0);
    assert_eq!(list_len(&state, "db_systems.0.ssh_public_keys"), 2);
}

#[tokio::test]
async fn compute_and_load_balancer_shapes() {
    let client = Arc::new(FakeClient::new());
    client.seed(
        "shapes",
        ["VM.Standard1.1", "BM.Standard1.36"].map(|name| json!({"name": name})),
    );
    client.seed(
        "load_balancer_shapes",
        ["100Mbps", "400Mbps", "8000Mbps"].map(|name| json!({"name": name})),
    );

    let compute = read(
        &client,
        "baremetal_core_shape",
        json!({"compartment_id": COMPARTMENT, "availability_domain": "Uocm:PHX-AD-1"}),
    )
    .await;
    assert_eq!(list_len(&compute, "shapes"), 2);
    assert_eq!(string(&compute, "shapes.0.name"), "VM.Standard1.1");

    let load_balancer = read(
        &client,
        "baremetal_load_balancer_shapes",
        json!({"compartment_id": COMPARTMENT, "limit": 2}),
    )
    .await;
    assert_eq!(list_len(&load_balancer, "shapes"), 3);
    assert_eq!(string(&load_balancer, "shapes.2.name"), "8000Mbps");
}

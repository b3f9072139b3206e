//! Load balancer backend set resource

use crate::api::models::{
    BackendSet, CreateBackendDetails, CreateBackendSetDetails, HealthChecker, SslConfiguration,
    UpdateBackendSetDetails, WorkRequest,
};
use crate::api::BareMetalClient;
use crate::crud::{CrudResult, Mutation, ResourceCrud};
use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::schema::{AttributeBuilder, AttributeType, NestedBlockBuilder, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::validator::{NumberRangeValidator, RegexCompilesValidator, StringOneOfValidator};
use tfplug::ResourceData;

pub const POLICIES: [&str; 3] = ["ROUND_ROBIN", "LEAST_CONNECTIONS", "IP_HASH"];
pub const HEALTH_CHECK_PROTOCOLS: [&str; 2] = ["HTTP", "TCP"];

#[derive(Default)]
pub struct BackendSetResource;

fn block_string(block: &HashMap<String, Dynamic>, key: &str) -> String {
    block
        .get(key)
        .and_then(Dynamic::as_str)
        .unwrap_or_default()
        .to_string()
}

fn block_int<T: TryFrom<i64> + Default>(block: &HashMap<String, Dynamic>, key: &str) -> T {
    block
        .get(key)
        .and_then(Dynamic::as_i64)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default()
}

fn block_bool(block: &HashMap<String, Dynamic>, key: &str) -> bool {
    block
        .get(key)
        .and_then(Dynamic::as_bool)
        .unwrap_or_default()
}

fn health_checker(d: &ResourceData) -> HealthChecker {
    match d.get_ok_block("health_checker") {
        Some(block) => HealthChecker {
            protocol: block_string(block, "protocol"),
            url_path: block_string(block, "url_path"),
            port: block_int(block, "port"),
            response_body_regex: block_string(block, "response_body_regex"),
            interval_in_millis: block_int(block, "interval_ms"),
            ..Default::default()
        },
        None => HealthChecker::default(),
    }
}

fn ssl_configuration(d: &ResourceData) -> Option<SslConfiguration> {
    d.get_ok_block("ssl_configuration")
        .map(|block| SslConfiguration {
            certificate_name: block_string(block, "certificate_name"),
            verify_depth: block_int(block, "verify_depth"),
            verify_peer_certificate: block_bool(block, "verify_peer_certificate"),
        })
}

/// Backends currently recorded in state. Updates resend them so the backend
/// set keeps its members.
fn backends(d: &ResourceData) -> Vec<CreateBackendDetails> {
    d.get_ok_list("backend")
        .unwrap_or_default()
        .iter()
        .filter_map(Dynamic::as_map)
        .map(|v| CreateBackendDetails {
            ip_address: block_string(v, "ip_address"),
            port: block_int(v, "port"),
            weight: block_int(v, "weight"),
            backup: block_bool(v, "backup"),
            drain: block_bool(v, "drain"),
            offline: block_bool(v, "offline"),
        })
        .collect()
}

fn backend_object_type() -> AttributeType {
    AttributeType::Object(HashMap::from([
        ("name".to_string(), AttributeType::String),
        ("ip_address".to_string(), AttributeType::String),
        ("port".to_string(), AttributeType::Number),
        ("weight".to_string(), AttributeType::Number),
        ("backup".to_string(), AttributeType::Bool),
        ("drain".to_string(), AttributeType::Bool),
        ("offline".to_string(), AttributeType::Bool),
    ]))
}

#[async_trait]
impl ResourceCrud for BackendSetResource {
    type Remote = BackendSet;

    fn type_name(&self) -> &'static str {
        "baremetal_load_balancer_backendset"
    }

    fn schema(&self) -> Schema {
        let backends = AttributeType::List(Box::new(backend_object_type()));
        SchemaBuilder::new()
            .version(0)
            .description("A load balancer backend set")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("load_balancer_id", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("policy", AttributeType::String)
                    .description("Load balancing policy")
                    .optional()
                    .validator(StringOneOfValidator::new(POLICIES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("backend", backends)
                    .description("Backends currently registered in the set")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("state", AttributeType::String)
                    .description("State of the last work request")
                    .computed()
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("health_checker")
                    .min_items(1)
                    .max_items(1)
                    .attribute(
                        AttributeBuilder::new("protocol", AttributeType::String)
                            .required()
                            .validator(StringOneOfValidator::new(HEALTH_CHECK_PROTOCOLS))
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("url_path", AttributeType::String)
                            .optional()
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("port", AttributeType::Number)
                            .optional()
                            .validator(NumberRangeValidator::port())
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("interval_ms", AttributeType::Number)
                            .optional()
                            .default(30000)
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("response_body_regex", AttributeType::String)
                            .optional()
                            .validator(RegexCompilesValidator)
                            .build(),
                    )
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("ssl_configuration")
                    .max_items(1)
                    .attribute(
                        AttributeBuilder::new("certificate_name", AttributeType::String)
                            .required()
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("verify_depth", AttributeType::Number)
                            .optional()
                            .default(5)
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("verify_peer_certificate", AttributeType::Bool)
                            .optional()
                            .default(true)
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    /// The remote name once known, otherwise the declared one
    fn id(&self, d: &ResourceData, remote: Option<&BackendSet>) -> String {
        remote
            .map(|s| s.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| d.get_string("name"))
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<BackendSet>> {
        let details = CreateBackendSetDetails {
            name: d.get_string("name"),
            policy: d.get_string("policy"),
            health_checker: health_checker(d),
            ssl_configuration: ssl_configuration(d),
        };
        let work_request = client
            .create_backend_set(&d.get_string("load_balancer_id"), details)
            .await?;
        Ok(Mutation::WorkRequest(work_request))
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<BackendSet> {
        Ok(client
            .get_backend_set(&d.get_string("load_balancer_id"), &d.get_string("name"))
            .await?)
    }

    async fn update(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<BackendSet>> {
        let details = UpdateBackendSetDetails {
            policy: d.get_string("policy"),
            backends: backends(d),
            health_checker: health_checker(d),
            ssl_configuration: ssl_configuration(d),
        };
        let work_request = client
            .update_backend_set(&d.get_string("load_balancer_id"), d.id(), details)
            .await?;
        Ok(Mutation::WorkRequest(work_request))
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<BackendSet>> {
        let work_request = client
            .delete_backend_set(&d.get_string("load_balancer_id"), &d.get_string("name"))
            .await?;
        Ok(Mutation::WorkRequest(work_request))
    }

    fn record_work_request(
        &self,
        d: &mut ResourceData,
        work_request: &WorkRequest,
    ) -> CrudResult<()> {
        d.set("state", work_request.state.as_str())?;
        Ok(())
    }

    fn set_data(&self, d: &mut ResourceData, remote: &BackendSet) -> CrudResult<()> {
        d.set("policy", remote.policy.as_str())?;
        d.set("name", remote.name.as_str())?;

        let hc = &remote.health_checker;
        d.set(
            "health_checker",
            vec![Dynamic::object([
                ("interval_ms", Dynamic::from(hc.interval_in_millis)),
                ("port", Dynamic::from(i64::from(hc.port))),
                ("protocol", Dynamic::from(hc.protocol.as_str())),
                ("response_body_regex", Dynamic::from(hc.response_body_regex.as_str())),
                ("url_path", Dynamic::from(hc.url_path.as_str())),
            ])],
        )?;

        let ssl: Vec<Dynamic> = remote
            .ssl_configuration
            .iter()
            .map(|ssl| {
                Dynamic::object([
                    ("certificate_name", Dynamic::from(ssl.certificate_name.as_str())),
                    ("verify_depth", Dynamic::from(ssl.verify_depth)),
                    ("verify_peer_certificate", Dynamic::from(ssl.verify_peer_certificate)),
                ])
            })
            .collect();
        d.set("ssl_configuration", ssl)?;

        let backends: Vec<Dynamic> = remote
            .backends
            .iter()
            .map(|b| {
                Dynamic::object([
                    ("backup", Dynamic::from(b.backup)),
                    ("drain", Dynamic::from(b.drain)),
                    ("ip_address", Dynamic::from(b.ip_address.as_str())),
                    ("name", Dynamic::from(b.name.as_str())),
                    ("offline", Dynamic::from(b.offline)),
                    ("port", Dynamic::from(i64::from(b.port))),
                    ("weight", Dynamic::from(b.weight)),
                ])
            })
            .collect();
        d.set("backend", backends)?;
        Ok(())
    }
}

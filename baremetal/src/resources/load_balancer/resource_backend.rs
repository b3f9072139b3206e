//! Load balancer backend resource

use crate::api::models::{Backend, CreateBackendDetails, UpdateBackendDetails, WorkRequest};
use crate::api::BareMetalClient;
use crate::crud::{get_int_as, CrudResult, Mutation, ResourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::validator::NumberRangeValidator;
use tfplug::ResourceData;

#[derive(Default)]
pub struct BackendResource;

fn create_details(d: &ResourceData) -> CrudResult<CreateBackendDetails> {
    Ok(CreateBackendDetails {
        ip_address: d.get_string("ip_address"),
        port: get_int_as(d, "port")?,
        weight: get_int_as(d, "weight")?,
        backup: d.get_bool("backup"),
        drain: d.get_bool("drain"),
        offline: d.get_bool("offline"),
    })
}

#[async_trait]
impl ResourceCrud for BackendResource {
    type Remote = Backend;

    fn type_name(&self) -> &'static str {
        "baremetal_load_balancer_backend"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("A backend server in a load balancer backend set")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("load_balancer_id", AttributeType::String)
                    .description("OCID of the load balancer")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("backendset_name", AttributeType::String)
                    .description("Name of the backend set the backend belongs to")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Backend name, conventionally ip_address:port")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("ip_address", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("port", AttributeType::Number)
                    .required()
                    .requires_replace()
                    .validator(NumberRangeValidator::port())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("backup", AttributeType::Bool)
                    .optional()
                    .default(false)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("drain", AttributeType::Bool)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("offline", AttributeType::Bool)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("weight", AttributeType::Number)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("state", AttributeType::String)
                    .description("State of the last work request")
                    .computed()
                    .build(),
            )
            .build()
    }

    fn id(&self, d: &ResourceData, remote: Option<&Backend>) -> String {
        remote
            .map(|b| b.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| d.get_string("name"))
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Backend>> {
        let work_request = client
            .create_backend(
                &d.get_string("load_balancer_id"),
                &d.get_string("backendset_name"),
                create_details(d)?,
            )
            .await?;
        Ok(Mutation::WorkRequest(work_request))
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Backend> {
        Ok(client
            .get_backend(
                &d.get_string("load_balancer_id"),
                &d.get_string("backendset_name"),
                &d.get_string("name"),
            )
            .await?)
    }

    async fn update(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Backend>> {
        let details = UpdateBackendDetails {
            weight: get_int_as(d, "weight")?,
            backup: d.get_bool("backup"),
            drain: d.get_bool("drain"),
            offline: d.get_bool("offline"),
        };
        let work_request = client
            .update_backend(
                &d.get_string("load_balancer_id"),
                &d.get_string("backendset_name"),
                d.id(),
                details,
            )
            .await?;
        Ok(Mutation::WorkRequest(work_request))
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Backend>> {
        let work_request = client
            .delete_backend(
                &d.get_string("load_balancer_id"),
                &d.get_string("backendset_name"),
                &d.get_string("name"),
            )
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

    fn set_data(&self, d: &mut ResourceData, remote: &Backend) -> CrudResult<()> {
        d.set("backup", remote.backup)?;
        d.set("drain", remote.drain)?;
        d.set("offline", remote.offline)?;
        d.set("weight", remote.weight)?;
        Ok(())
    }
}

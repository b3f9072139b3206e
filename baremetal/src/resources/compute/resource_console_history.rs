//! Instance console history capture

use crate::api::models::{CaptureConsoleHistoryDetails, ConsoleHistory};
use crate::api::{BareMetalClient, LifecycleState};
use crate::crud::{CrudResult, Mutation, ResourceCrud, StateSets};
use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::ResourceData;

#[derive(Default)]
pub struct ConsoleHistoryResource;

#[async_trait]
impl ResourceCrud for ConsoleHistoryResource {
    type Remote = ConsoleHistory;

    fn type_name(&self) -> &'static str {
        "baremetal_core_console_history"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Captures the serial console history of an instance")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("instance_id", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("availability_domain", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("compartment_id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("display_name", AttributeType::String)
                    .optional()
                    .computed()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("state", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("time_created", AttributeType::String)
                    .computed()
                    .build(),
            )
            .build()
    }

    fn id(&self, d: &ResourceData, remote: Option<&ConsoleHistory>) -> String {
        remote
            .map(|h| h.id.clone())
            .unwrap_or_else(|| d.id().to_string())
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<ConsoleHistory>> {
        let details = CaptureConsoleHistoryDetails {
            instance_id: d.get_string("instance_id"),
            display_name: d.get_string("display_name"),
        };
        let history = client.capture_console_history(details).await?;
        Ok(Mutation::Lifecycle(Some(history)))
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<ConsoleHistory> {
        Ok(client.get_console_history(d.id()).await?)
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<ConsoleHistory>> {
        client.delete_console_history(d.id()).await?;
        Ok(Mutation::Done(None))
    }

    fn set_data(&self, d: &mut ResourceData, remote: &ConsoleHistory) -> CrudResult<()> {
        d.set("availability_domain", remote.availability_domain.as_str())?;
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("display_name", remote.display_name.as_str())?;
        d.set("instance_id", remote.instance_id.as_str())?;
        d.set("state", remote.lifecycle_state.as_str())?;
        d.set("time_created", remote.time_created.to_string())?;
        Ok(())
    }

    fn lifecycle_state(&self, remote: &ConsoleHistory) -> Option<LifecycleState> {
        Some(remote.lifecycle_state)
    }

    fn created_states(&self) -> StateSets<LifecycleState> {
        StateSets::new(
            [LifecycleState::Requested, LifecycleState::GettingHistory],
            [LifecycleState::Succeeded],
        )
    }
}

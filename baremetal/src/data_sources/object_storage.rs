use super::{computed, id_attribute, required_string};
use crate::api::models::HeadObject;
use crate::api::BareMetalClient;
use crate::crud::{synthesized_id, CrudResult, DataSourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::ResourceData;

/// The object storage namespace of the configured tenancy
#[derive(Default)]
pub struct NamespaceDataSource;

#[async_trait]
impl DataSourceCrud for NamespaceDataSource {
    type Remote = String;

    fn type_name(&self) -> &'static str {
        "baremetal_objectstorage_namespace"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("Object storage namespace of the tenancy")
            .attribute(id_attribute())
            .attribute(computed("namespace", AttributeType::String))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, _d: &ResourceData) -> CrudResult<String> {
        Ok(client.get_namespace().await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &String) -> CrudResult<()> {
        d.set_id(synthesized_id());
        d.set("namespace", remote.as_str())?;
        Ok(())
    }
}

/// Object metadata without the body
#[derive(Default)]
pub struct ObjectHeadDataSource;

#[async_trait]
impl DataSourceCrud for ObjectHeadDataSource {
    type Remote = HeadObject;

    fn type_name(&self) -> &'static str {
        "baremetal_objectstorage_object_head"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("Metadata of a stored object")
            .attribute(id_attribute())
            .attribute(required_string("namespace"))
            .attribute(required_string("bucket"))
            .attribute(required_string("object"))
            .attribute(computed("content_length", AttributeType::Number))
            .attribute(computed("content_type", AttributeType::String))
            .attribute(computed(
                "metadata",
                AttributeType::Map(Box::new(AttributeType::String)),
            ))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<HeadObject> {
        Ok(client
            .head_object(
                &d.get_string("namespace"),
                &d.get_string("bucket"),
                &d.get_string("object"),
            )
            .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &HeadObject) -> CrudResult<()> {
        d.set_id(synthesized_id());
        d.set("content_length", remote.content_length)?;
        d.set("content_type", remote.content_type.as_str())?;
        d.set("metadata", remote.metadata.clone())?;
        Ok(())
    }
}

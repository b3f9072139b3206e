//! Object storage bucket resource

use crate::api::models::{Bucket, CreateBucketDetails, UpdateBucketDetails};
use crate::api::BareMetalClient;
use crate::crud::{CrudResult, Mutation, ResourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::ResourceData;

#[derive(Default)]
pub struct BucketResource;

#[async_trait]
impl ResourceCrud for BucketResource {
    type Remote = Bucket;

    fn type_name(&self) -> &'static str {
        "baremetal_objectstorage_bucket"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("An object storage bucket")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("compartment_id", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("namespace", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "metadata",
                    AttributeType::Map(Box::new(AttributeType::String)),
                )
                    .description("User-defined metadata")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("created_by", AttributeType::String)
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

    fn id(&self, d: &ResourceData, remote: Option<&Bucket>) -> String {
        match remote {
            Some(bucket) => format!("{}/{}", bucket.namespace, bucket.name),
            None => format!("{}/{}", d.get_string("namespace"), d.get_string("name")),
        }
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Bucket>> {
        let details = CreateBucketDetails {
            name: d.get_string("name"),
            compartment_id: d.get_string("compartment_id"),
            metadata: d.get_string_map("metadata"),
        };
        let bucket = client
            .create_bucket(&d.get_string("namespace"), details)
            .await?;
        Ok(Mutation::Done(Some(bucket)))
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Bucket> {
        Ok(client
            .get_bucket(&d.get_string("namespace"), &d.get_string("name"))
            .await?)
    }

    async fn update(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Bucket>> {
        let name = d.get_string("name");
        let details = UpdateBucketDetails {
            name: name.clone(),
            metadata: d.get_string_map("metadata"),
        };
        let bucket = client
            .update_bucket(&d.get_string("namespace"), &name, details)
            .await?;
        Ok(Mutation::Done(Some(bucket)))
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Bucket>> {
        client
            .delete_bucket(&d.get_string("namespace"), &d.get_string("name"))
            .await?;
        Ok(Mutation::Done(None))
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Bucket) -> CrudResult<()> {
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("name", remote.name.as_str())?;
        d.set("namespace", remote.namespace.as_str())?;
        d.set("metadata", remote.metadata.clone())?;
        d.set("created_by", remote.created_by.as_str())?;
        d.set("time_created", remote.time_created.to_string())?;
        Ok(())
    }
}

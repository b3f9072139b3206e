//! Object storage object resource
//!
//! Objects are written with a single put; updating re-puts the whole body.
//! Ids have the form `tfobm-object-<namespace>/<bucket>/<object>` so that
//! `terraform import` can locate the object from the id alone.

use crate::api::models::{Object, PutObjectDetails};
use crate::api::BareMetalClient;
use crate::crud::{CrudResult, Mutation, ResourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::ResourceData;

const ID_PREFIX: &str = "tfobm-object-";

#[derive(Default)]
pub struct ObjectResource;

pub fn object_id(namespace: &str, bucket: &str, object: &str) -> String {
    format!("{ID_PREFIX}{namespace}/{bucket}/{object}")
}

/// Namespace, bucket and object name encoded in an object id. Object names
/// may themselves contain slashes.
pub fn parse_object_id(id: &str) -> Option<(String, String, String)> {
    let rest = id.strip_prefix(ID_PREFIX)?;
    let mut parts = rest.splitn(3, '/');
    let namespace = parts.next().filter(|s| !s.is_empty())?;
    let bucket = parts.next().filter(|s| !s.is_empty())?;
    let object = parts.next().filter(|s| !s.is_empty())?;
    Some((
        namespace.to_string(),
        bucket.to_string(),
        object.to_string(),
    ))
}

/// The object location, from attributes or, right after an import, the id
fn location(d: &ResourceData) -> (String, String, String) {
    match (
        d.get_ok_string("namespace"),
        d.get_ok_string("bucket"),
        d.get_ok_string("object"),
    ) {
        (Some(namespace), Some(bucket), Some(object)) => (namespace, bucket, object),
        _ => parse_object_id(d.id()).unwrap_or_default(),
    }
}

async fn put(client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Object> {
    let (namespace, bucket, object) = location(d);
    let details = PutObjectDetails {
        content: d.get_string("content"),
        metadata: d.get_string_map("metadata"),
    };
    let stored = client
        .put_object(&namespace, &bucket, &object, details)
        .await?;
    Ok(stored)
}

#[async_trait]
impl ResourceCrud for ObjectResource {
    type Remote = Object;

    fn type_name(&self) -> &'static str {
        "baremetal_objectstorage_object"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("An object stored in an object storage bucket")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("namespace", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("object", AttributeType::String)
                    .description("Object name")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("content", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "metadata",
                    AttributeType::Map(Box::new(AttributeType::String)),
                )
                    .optional()
                    .build(),
            )
            .build()
    }

    fn id(&self, d: &ResourceData, remote: Option<&Object>) -> String {
        match remote {
            Some(o) => object_id(&o.namespace, &o.bucket, &o.name),
            None => {
                let (namespace, bucket, object) = location(d);
                object_id(&namespace, &bucket, &object)
            }
        }
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Object>> {
        Ok(Mutation::Done(Some(put(client, d).await?)))
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Object> {
        let (namespace, bucket, object) = location(d);
        Ok(client.get_object(&namespace, &bucket, &object).await?)
    }

    async fn update(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Object>> {
        Ok(Mutation::Done(Some(put(client, d).await?)))
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Object>> {
        let (namespace, bucket, object) = location(d);
        client.delete_object(&namespace, &bucket, &object).await?;
        Ok(Mutation::Done(None))
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Object) -> CrudResult<()> {
        d.set("namespace", remote.namespace.as_str())?;
        d.set("bucket", remote.bucket.as_str())?;
        d.set("object", remote.name.as_str())?;
        d.set("content", remote.content.as_str())?;
        d.set("metadata", remote.metadata.clone())?;
        Ok(())
    }

    fn importable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_keeps_slashes_in_object_names() {
        let id = object_id("ns", "logs", "2017/06/app.log");
        assert_eq!(id, "tfobm-object-ns/logs/2017/06/app.log");
        assert_eq!(
            parse_object_id(&id),
            Some((
                "ns".to_string(),
                "logs".to_string(),
                "2017/06/app.log".to_string(),
            ))
        );
    }

    #[test]
    fn malformed_ids() {
        assert!(parse_object_id("ns/bucket/object").is_none());
        assert!(parse_object_id("tfobm-object-ns/bucket").is_none());
        assert!(parse_object_id("tfobm-object-ns//object").is_none());
    }

    #[test]
    fn location_falls_back_to_the_id() {
        let mut d = ResourceData::new();
        d.set_id("tfobm-object-ns/b/o");
        assert_eq!(
            location(&d),
            ("ns".to_string(), "b".to_string(), "o".to_string())
        );
    }
}

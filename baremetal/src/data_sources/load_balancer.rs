use super::{computed_objects, id_attribute, paged, required_string};
use crate::api::models::LoadBalancerShape;
use crate::api::BareMetalClient;
use crate::crud::{collect_pages, list_options, synthesized_id, CrudResult, DataSourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::ResourceData;

#[derive(Default)]
pub struct LoadBalancerShapesDataSource;

#[async_trait]
impl DataSourceCrud for LoadBalancerShapesDataSource {
    type Remote = Vec<LoadBalancerShape>;

    fn type_name(&self) -> &'static str {
        "baremetal_load_balancer_shapes"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Load balancer shapes available in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects(
                "shapes",
                &[("name", AttributeType::String)],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<LoadBalancerShape>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_load_balancer_shapes(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<LoadBalancerShape>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let shapes: Vec<Dynamic> = remote
            .iter()
            .map(|s| Dynamic::object([("name", Dynamic::from(s.name.as_str()))]))
            .collect();
        d.set("shapes", shapes)?;
        Ok(())
    }
}

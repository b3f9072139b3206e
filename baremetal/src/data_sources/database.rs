use super::{computed, computed_objects, id_attribute, paged, required_string, string_list};
use crate::api::models::{Database, DbHome, DbSystem, DbVersion};
use crate::api::BareMetalClient;
use crate::crud::{collect_pages, list_options, synthesized_id, CrudResult, DataSourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::ResourceData;

#[derive(Default)]
pub struct DatabaseDataSource;

#[async_trait]
impl DataSourceCrud for DatabaseDataSource {
    type Remote = Database;

    fn type_name(&self) -> &'static str {
        "baremetal_database_database"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("A single database")
            .attribute(id_attribute())
            .attribute(required_string("database_id"))
            .attribute(computed("compartment_id", AttributeType::String))
            .attribute(computed("db_home_id", AttributeType::String))
            .attribute(computed("db_name", AttributeType::String))
            .attribute(computed("db_unique_name", AttributeType::String))
            .attribute(computed("state", AttributeType::String))
            .attribute(computed("time_created", AttributeType::String))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Database> {
        Ok(client.get_database(&d.get_string("database_id")).await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Database) -> CrudResult<()> {
        d.set_id(&remote.id);
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("db_home_id", remote.db_home_id.as_str())?;
        d.set("db_name", remote.db_name.as_str())?;
        d.set("db_unique_name", remote.db_unique_name.as_str())?;
        d.set("state", remote.lifecycle_state.as_str())?;
        d.set("time_created", remote.time_created.to_string())?;
        Ok(())
    }
}

#[derive(Default)]
pub struct DbHomeDataSource;

#[async_trait]
impl DataSourceCrud for DbHomeDataSource {
    type Remote = DbHome;

    fn type_name(&self) -> &'static str {
        "baremetal_database_db_home"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("A single database home")
            .attribute(id_attribute())
            .attribute(required_string("db_home_id"))
            .attribute(computed("compartment_id", AttributeType::String))
            .attribute(computed("db_system_id", AttributeType::String))
            .attribute(computed("db_version", AttributeType::String))
            .attribute(computed("display_name", AttributeType::String))
            .attribute(computed("state", AttributeType::String))
            .attribute(computed("time_created", AttributeType::String))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<DbHome> {
        Ok(client.get_db_home(&d.get_string("db_home_id")).await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &DbHome) -> CrudResult<()> {
        d.set_id(&remote.id);
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("db_system_id", remote.db_system_id.as_str())?;
        d.set("db_version", remote.db_version.as_str())?;
        d.set("display_name", remote.display_name.as_str())?;
        d.set("state", remote.lifecycle_state.as_str())?;
        d.set("time_created", remote.time_created.to_string())?;
        Ok(())
    }
}

#[derive(Default)]
pub struct DbSystemsDataSource;

#[async_trait]
impl DataSourceCrud for DbSystemsDataSource {
    type Remote = Vec<DbSystem>;

    fn type_name(&self) -> &'static str {
        "baremetal_database_db_systems"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Database systems in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects(
                "db_systems",
                &[
                    ("availability_domain", AttributeType::String),
                    ("compartment_id", AttributeType::String),
                    ("cpu_core_count", AttributeType::Number),
                    ("database_edition", AttributeType::String),
                    ("disk_redundancy", AttributeType::String),
                    ("display_name", AttributeType::String),
                    ("domain", AttributeType::String),
                    ("hostname", AttributeType::String),
                    ("id", AttributeType::String),
                    ("lifecycle_details", AttributeType::String),
                    ("listener_port", AttributeType::Number),
                    ("shape", AttributeType::String),
                    ("ssh_public_keys", string_list()),
                    ("state", AttributeType::String),
                    ("subnet_id", AttributeType::String),
                    ("time_created", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<DbSystem>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_db_systems(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<DbSystem>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let systems: Vec<Dynamic> = remote
            .iter()
            .map(|s| {
                Dynamic::object([
                    ("availability_domain", Dynamic::from(s.availability_domain.as_str())),
                    ("compartment_id", Dynamic::from(s.compartment_id.as_str())),
                    ("cpu_core_count", Dynamic::from(s.cpu_core_count)),
                    ("database_edition", Dynamic::from(s.database_edition.as_str())),
                    ("disk_redundancy", Dynamic::from(s.disk_redundancy.as_str())),
                    ("display_name", Dynamic::from(s.display_name.as_str())),
                    ("domain", Dynamic::from(s.domain.as_str())),
                    ("hostname", Dynamic::from(s.hostname.as_str())),
                    ("id", Dynamic::from(s.id.as_str())),
                    ("lifecycle_details", Dynamic::from(s.lifecycle_details.as_str())),
                    ("listener_port", Dynamic::from(i64::from(s.listener_port))),
                    ("shape", Dynamic::from(s.shape.as_str())),
                    ("ssh_public_keys", Dynamic::from(s.ssh_public_keys.clone())),
                    ("state", Dynamic::from(s.lifecycle_state.as_str())),
                    ("subnet_id", Dynamic::from(s.subnet_id.as_str())),
                    ("time_created", Dynamic::from(s.time_created.to_string())),
                ])
            })
            .collect();
        d.set("db_systems", systems)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct DbVersionsDataSource;

#[async_trait]
impl DataSourceCrud for DbVersionsDataSource {
    type Remote = Vec<DbVersion>;

    fn type_name(&self) -> &'static str {
        "baremetal_database_db_versions"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Supported database versions"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects(
                "db_versions",
                &[("version", AttributeType::String)],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<DbVersion>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_db_versions(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<DbVersion>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let versions: Vec<Dynamic> = remote
            .iter()
            .map(|v| Dynamic::object([("version", Dynamic::from(v.version.as_str()))]))
            .collect();
        d.set("db_versions", versions)?;
        Ok(())
    }
}

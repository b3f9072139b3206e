//! Database system resource
//!
//! A DB system provisions for a long time; creation and termination are
//! followed through the system's own lifecycle state. The service never
//! returns the `db_home` details after launch, so they are kept as declared.

use crate::api::models::{
    CreateDatabaseDetails, CreateDbHomeDetails, DbSystem, LaunchDbSystemDetails,
};
use crate::api::{BareMetalClient, LifecycleState};
use crate::crud::{get_int_as, CrudResult, Mutation, ResourceCrud};
use async_trait::async_trait;
use std::time::Duration;
use tfplug::schema::{AttributeBuilder, AttributeType, NestedBlockBuilder, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::{ResourceData, ResourceTimeouts};

const TWO_HOURS: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Default)]
pub struct DbSystemResource;

fn db_home(d: &ResourceData) -> Option<CreateDbHomeDetails> {
    d.get_ok_block("db_home")?;
    Some(CreateDbHomeDetails {
        db_version: d.get_string("db_home.0.db_version"),
        display_name: d.get_string("db_home.0.display_name"),
        database: CreateDatabaseDetails {
            admin_password: d.get_string("db_home.0.database.0.admin_password"),
            db_name: d.get_string("db_home.0.database.0.db_name"),
        },
    })
}

fn forced(name: &str, r#type: AttributeType) -> AttributeBuilder {
    AttributeBuilder::new(name, r#type).requires_replace()
}

#[async_trait]
impl ResourceCrud for DbSystemResource {
    type Remote = DbSystem;

    fn type_name(&self) -> &'static str {
        "baremetal_database_db_system"
    }

    fn schema(&self) -> Schema {
        let string_list = AttributeType::List(Box::new(AttributeType::String));

        SchemaBuilder::new()
            .version(0)
            .description("A database system")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                forced("availability_domain", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                forced("compartment_id", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(forced("shape", AttributeType::String).required().build())
            .attribute(
                forced("subnet_id", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(forced("ssh_public_keys", string_list).required().build())
            .attribute(
                forced("cpu_core_count", AttributeType::Number)
                    .required()
                    .build(),
            )
            .attribute(
                forced("display_name", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                forced("database_edition", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                forced("disk_redundancy", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                forced("domain", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                forced("hostname", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("state", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("lifecycle_details", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("listener_port", AttributeType::Number)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("time_created", AttributeType::String)
                    .computed()
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("db_home")
                    .max_items(1)
                    .requires_replace()
                    .attribute(
                        AttributeBuilder::new("db_version", AttributeType::String)
                            .required()
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("display_name", AttributeType::String)
                            .optional()
                            .build(),
                    )
                    .block(
                        NestedBlockBuilder::new("database")
                            .min_items(1)
                            .max_items(1)
                            .attribute(
                                AttributeBuilder::new("admin_password", AttributeType::String)
                                    .required()
                                    .sensitive()
                                    .build(),
                            )
                            .attribute(
                                AttributeBuilder::new("db_name", AttributeType::String)
                                    .required()
                                    .build(),
                            )
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    fn id(&self, d: &ResourceData, remote: Option<&DbSystem>) -> String {
        remote
            .map(|s| s.id.clone())
            .unwrap_or_else(|| d.id().to_string())
    }

    fn timeouts(&self) -> ResourceTimeouts {
        ResourceTimeouts {
            create: TWO_HOURS,
            delete: TWO_HOURS,
            ..ResourceTimeouts::default()
        }
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<DbSystem>> {
        let details = LaunchDbSystemDetails {
            availability_domain: d.get_string("availability_domain"),
            compartment_id: d.get_string("compartment_id"),
            shape: d.get_string("shape"),
            subnet_id: d.get_string("subnet_id"),
            ssh_public_keys: d.get_string_list("ssh_public_keys"),
            cpu_core_count: get_int_as(d, "cpu_core_count")?,
            display_name: d.get_string("display_name"),
            database_edition: d.get_string("database_edition"),
            db_home: db_home(d),
            disk_redundancy: d.get_string("disk_redundancy"),
            domain: d.get_string("domain"),
            hostname: d.get_string("hostname"),
        };
        let launched = client.launch_db_system(details).await?;
        Ok(Mutation::Lifecycle(Some(launched)))
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<DbSystem> {
        Ok(client.get_db_system(d.id()).await?)
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<DbSystem>> {
        client.terminate_db_system(d.id()).await?;
        Ok(Mutation::Lifecycle(None))
    }

    fn set_data(&self, d: &mut ResourceData, remote: &DbSystem) -> CrudResult<()> {
        d.set("availability_domain", remote.availability_domain.as_str())?;
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("shape", remote.shape.as_str())?;
        d.set("subnet_id", remote.subnet_id.as_str())?;
        d.set("ssh_public_keys", remote.ssh_public_keys.clone())?;
        d.set("cpu_core_count", remote.cpu_core_count)?;
        d.set("display_name", remote.display_name.as_str())?;
        d.set("database_edition", remote.database_edition.as_str())?;
        d.set("disk_redundancy", remote.disk_redundancy.as_str())?;
        d.set("domain", remote.domain.as_str())?;
        d.set("hostname", remote.hostname.as_str())?;
        d.set("state", remote.lifecycle_state.as_str())?;
        d.set("lifecycle_details", remote.lifecycle_details.as_str())?;
        d.set("listener_port", i64::from(remote.listener_port))?;
        d.set("time_created", remote.time_created.to_string())?;

        if let Some(home) = &remote.db_home {
            // The admin password is never echoed back; keep the declared one
            let admin_password = d.get_string("db_home.0.database.0.admin_password");
            d.set(
                "db_home",
                vec![Dynamic::object([
                    ("db_version", Dynamic::from(home.db_version.as_str())),
                    ("display_name", Dynamic::from(home.display_name.as_str())),
                    (
                        "database",
                        Dynamic::from(vec![Dynamic::object([
                            ("admin_password", Dynamic::from(admin_password)),
                            ("db_name", Dynamic::from(home.database.db_name.as_str())),
                        ])]),
                    ),
                ])],
            )?;
        }
        Ok(())
    }

    fn lifecycle_state(&self, remote: &DbSystem) -> Option<LifecycleState> {
        Some(remote.lifecycle_state)
    }
}

use super::{computed_objects, id_attribute, paged, required_string, string_list};
use crate::api::models::{AvailabilityDomain, Group, Policy, User};
use crate::api::{BareMetalClient, LifecycleState};
use crate::crud::{collect_pages, list_options, synthesized_id, CrudResult, DataSourceCrud};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::ResourceData;

/// Fields shared by the group and user listings
fn principal_fields() -> Vec<(&'static str, AttributeType)> {
    vec![
        ("compartment_id", AttributeType::String),
        ("description", AttributeType::String),
        ("id", AttributeType::String),
        ("inactive_state", AttributeType::Number),
        ("name", AttributeType::String),
        ("state", AttributeType::String),
        ("time_created", AttributeType::String),
    ]
}

/// Borrowed view of the fields groups, users and policies have in common
struct Principal<'a> {
    id: &'a str,
    compartment_id: &'a str,
    name: &'a str,
    description: &'a str,
    lifecycle_state: LifecycleState,
    time_created: &'a DateTime<Utc>,
    inactive_status: Option<u64>,
}

impl Principal<'_> {
    fn to_object(&self) -> Dynamic {
        Dynamic::object([
            ("compartment_id", Dynamic::from(self.compartment_id)),
            ("description", Dynamic::from(self.description)),
            ("id", Dynamic::from(self.id)),
            ("inactive_state", Dynamic::from(self.inactive_status)),
            ("name", Dynamic::from(self.name)),
            ("state", Dynamic::from(self.lifecycle_state.as_str())),
            ("time_created", Dynamic::from(self.time_created.to_string())),
        ])
    }
}

impl<'a> From<&'a Group> for Principal<'a> {
    fn from(g: &'a Group) -> Self {
        Self {
            id: &g.id,
            compartment_id: &g.compartment_id,
            name: &g.name,
            description: &g.description,
            lifecycle_state: g.lifecycle_state,
            time_created: &g.time_created,
            inactive_status: g.inactive_status,
        }
    }
}

impl<'a> From<&'a User> for Principal<'a> {
    fn from(u: &'a User) -> Self {
        Self {
            id: &u.id,
            compartment_id: &u.compartment_id,
            name: &u.name,
            description: &u.description,
            lifecycle_state: u.lifecycle_state,
            time_created: &u.time_created,
            inactive_status: u.inactive_status,
        }
    }
}

impl<'a> From<&'a Policy> for Principal<'a> {
    fn from(p: &'a Policy) -> Self {
        Self {
            id: &p.id,
            compartment_id: &p.compartment_id,
            name: &p.name,
            description: &p.description,
            lifecycle_state: p.lifecycle_state,
            time_created: &p.time_created,
            inactive_status: p.inactive_status,
        }
    }
}

#[derive(Default)]
pub struct AvailabilityDomainsDataSource;

#[async_trait]
impl DataSourceCrud for AvailabilityDomainsDataSource {
    type Remote = Vec<AvailabilityDomain>;

    fn type_name(&self) -> &'static str {
        "baremetal_identity_availability_domains"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("Availability domains visible to a compartment")
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects(
                "availability_domains",
                &[
                    ("compartment_id", AttributeType::String),
                    ("name", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<AvailabilityDomain>> {
        Ok(client
            .list_availability_domains(&d.get_string("compartment_id"))
            .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<AvailabilityDomain>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let domains: Vec<Dynamic> = remote
            .iter()
            .map(|ad| {
                Dynamic::object([
                    ("compartment_id", Dynamic::from(ad.compartment_id.as_str())),
                    ("name", Dynamic::from(ad.name.as_str())),
                ])
            })
            .collect();
        d.set("availability_domains", domains)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct GroupsDataSource;

#[async_trait]
impl DataSourceCrud for GroupsDataSource {
    type Remote = Vec<Group>;

    fn type_name(&self) -> &'static str {
        "baremetal_identity_groups"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Groups in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects("groups", &principal_fields()))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Vec<Group>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_groups(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<Group>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let groups: Vec<Dynamic> = remote
            .iter()
            .map(|g| Principal::from(g).to_object())
            .collect();
        d.set("groups", groups)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct UsersDataSource;

#[async_trait]
impl DataSourceCrud for UsersDataSource {
    type Remote = Vec<User>;

    fn type_name(&self) -> &'static str {
        "baremetal_identity_users"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Users in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects("users", &principal_fields()))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Vec<User>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_users(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<User>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let users: Vec<Dynamic> = remote
            .iter()
            .map(|u| Principal::from(u).to_object())
            .collect();
        d.set("users", users)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct PoliciesDataSource;

#[async_trait]
impl DataSourceCrud for PoliciesDataSource {
    type Remote = Vec<Policy>;

    fn type_name(&self) -> &'static str {
        "baremetal_identity_policies"
    }

    fn schema(&self) -> Schema {
        let mut fields = principal_fields();
        fields.push(("statements", string_list()));

        paged(SchemaBuilder::new().description("Policies in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(computed_objects("policies", &fields))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Vec<Policy>> {
        let compartment_id = d.get_string("compartment_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_policies(&compartment_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<Policy>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let policies: Vec<Dynamic> = remote
            .iter()
            .map(|p| {
                let mut policy = Principal::from(p).to_object();
                if let Dynamic::Map(fields) = &mut policy {
                    fields.insert(
                        "statements".to_string(),
                        Dynamic::from(p.statements.clone()),
                    );
                }
                policy
            })
            .collect();
        d.set("policies", policies)?;
        Ok(())
    }
}

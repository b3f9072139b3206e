//! Read-only data sources, one module per service

mod compute;
mod database;
mod identity;
mod load_balancer;
mod object_storage;

pub use compute::{
    DhcpOptionsDataSource, InternetGatewaysDataSource, IpSecStatusDataSource, ShapesDataSource,
    VnicAttachmentsDataSource, VolumeBackupsDataSource,
};
pub use database::{DatabaseDataSource, DbHomeDataSource, DbSystemsDataSource, DbVersionsDataSource};
pub use identity::{
    AvailabilityDomainsDataSource, GroupsDataSource, PoliciesDataSource, UsersDataSource,
};
pub use load_balancer::LoadBalancerShapesDataSource;
pub use object_storage::{NamespaceDataSource, ObjectHeadDataSource};

use std::collections::HashMap;
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};

fn id_attribute() -> Attribute {
    AttributeBuilder::new("id", AttributeType::String)
        .computed()
        .build()
}

fn required_string(name: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .required()
        .build()
}

fn optional_string(name: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .optional()
        .build()
}

fn computed(name: &str, r#type: AttributeType) -> Attribute {
    AttributeBuilder::new(name, r#type).computed().build()
}

fn object(fields: &[(&str, AttributeType)]) -> AttributeType {
    AttributeType::Object(
        fields
            .iter()
            .map(|(name, t)| (name.to_string(), t.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

/// A computed list of objects with the given fields
fn computed_objects(name: &str, fields: &[(&str, AttributeType)]) -> Attribute {
    computed(name, AttributeType::List(Box::new(object(fields))))
}

/// Adds the `page` cursor and `limit` page size accepted by listing data sources
fn paged(builder: SchemaBuilder) -> SchemaBuilder {
    builder
        .attribute(
            AttributeBuilder::new("page", AttributeType::String)
                .description("Page token to start listing from")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("limit", AttributeType::Number)
                .description("Maximum number of items per page")
                .optional()
                .build(),
        )
}

fn string_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

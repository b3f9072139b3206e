use super::{
    computed, computed_objects, id_attribute, optional_string, paged, required_string, string_list,
};
use crate::api::models::{
    DhcpOptions, InternetGateway, IpSecConnectionDeviceStatus, Shape, ShapeFilter, VnicAttachment,
    VnicAttachmentFilter, VolumeBackup,
};
use crate::api::BareMetalClient;
use crate::crud::{collect_pages, list_options, synthesized_id, CrudResult, DataSourceCrud};
use async_trait::async_trait;
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::types::Dynamic;
use tfplug::ResourceData;

#[derive(Default)]
pub struct DhcpOptionsDataSource;

#[async_trait]
impl DataSourceCrud for DhcpOptionsDataSource {
    type Remote = Vec<DhcpOptions>;

    fn type_name(&self) -> &'static str {
        "baremetal_core_dhcp_options"
    }

    fn schema(&self) -> Schema {
        let option = AttributeType::Object(
            [
                ("type".to_string(), AttributeType::String),
                ("custom_dns_servers".to_string(), string_list()),
                ("server_type".to_string(), AttributeType::String),
            ]
            .into_iter()
            .collect(),
        );

        paged(SchemaBuilder::new().description("DHCP option sets of a VCN"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(required_string("vcn_id"))
            .attribute(computed_objects(
                "options",
                &[
                    ("compartment_id", AttributeType::String),
                    ("display_name", AttributeType::String),
                    ("id", AttributeType::String),
                    ("options", AttributeType::List(Box::new(option))),
                    ("state", AttributeType::String),
                    ("time_created", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<DhcpOptions>> {
        let compartment_id = d.get_string("compartment_id");
        let vcn_id = d.get_string("vcn_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_dhcp_options(&compartment_id, &vcn_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<DhcpOptions>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let options: Vec<Dynamic> = remote
            .iter()
            .map(|v| {
                let entries: Vec<Dynamic> = v
                    .options
                    .iter()
                    .map(|o| {
                        Dynamic::object([
                            ("type", Dynamic::from(o.option_type.as_str())),
                            ("custom_dns_servers", Dynamic::from(o.custom_dns_servers.clone())),
                            ("server_type", Dynamic::from(o.server_type.as_str())),
                        ])
                    })
                    .collect();
                Dynamic::object([
                    ("compartment_id", Dynamic::from(v.compartment_id.as_str())),
                    ("display_name", Dynamic::from(v.display_name.as_str())),
                    ("id", Dynamic::from(v.id.as_str())),
                    ("options", Dynamic::from(entries)),
                    ("state", Dynamic::from(v.lifecycle_state.as_str())),
                    ("time_created", Dynamic::from(v.time_created.to_string())),
                ])
            })
            .collect();
        d.set("options", options)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct InternetGatewaysDataSource;

#[async_trait]
impl DataSourceCrud for InternetGatewaysDataSource {
    type Remote = Vec<InternetGateway>;

    fn type_name(&self) -> &'static str {
        "baremetal_core_internet_gateways"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Internet gateways of a VCN"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(required_string("vcn_id"))
            .attribute(computed_objects(
                "gateways",
                &[
                    ("compartment_id", AttributeType::String),
                    ("display_name", AttributeType::String),
                    ("enabled", AttributeType::Bool),
                    ("id", AttributeType::String),
                    ("state", AttributeType::String),
                    ("time_created", AttributeType::String),
                    ("vcn_id", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<InternetGateway>> {
        let compartment_id = d.get_string("compartment_id");
        let vcn_id = d.get_string("vcn_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_internet_gateways(&compartment_id, &vcn_id, options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<InternetGateway>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let gateways: Vec<Dynamic> = remote
            .iter()
            .map(|v| {
                Dynamic::object([
                    ("compartment_id", Dynamic::from(v.compartment_id.as_str())),
                    ("display_name", Dynamic::from(v.display_name.as_str())),
                    ("enabled", Dynamic::from(v.is_enabled)),
                    ("id", Dynamic::from(v.id.as_str())),
                    ("state", Dynamic::from(v.lifecycle_state.as_str())),
                    ("time_created", Dynamic::from(v.time_created.to_string())),
                    ("vcn_id", Dynamic::from(v.vcn_id.as_str())),
                ])
            })
            .collect();
        d.set("gateways", gateways)?;
        Ok(())
    }
}

/// Tunnel status of an IPSec connection; keyed by the connection id
#[derive(Default)]
pub struct IpSecStatusDataSource;

#[async_trait]
impl DataSourceCrud for IpSecStatusDataSource {
    type Remote = IpSecConnectionDeviceStatus;

    fn type_name(&self) -> &'static str {
        "baremetal_core_ipsec_status"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("Tunnel status of an IPSec connection")
            .attribute(id_attribute())
            .attribute(required_string("ipsec_id"))
            .attribute(computed("compartment_id", AttributeType::String))
            .attribute(computed("time_created", AttributeType::String))
            .attribute(computed_objects(
                "tunnels",
                &[
                    ("ip_address", AttributeType::String),
                    ("state", AttributeType::String),
                    ("time_created", AttributeType::String),
                    ("time_state_modified", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<IpSecConnectionDeviceStatus> {
        Ok(client
            .get_ipsec_connection_device_status(&d.get_string("ipsec_id"))
            .await?)
    }

    fn set_data(
        &self,
        d: &mut ResourceData,
        remote: &IpSecConnectionDeviceStatus,
    ) -> CrudResult<()> {
        d.set_id(&remote.id);
        d.set("compartment_id", remote.compartment_id.as_str())?;
        d.set("time_created", remote.time_created.to_string())?;
        let tunnels: Vec<Dynamic> = remote
            .tunnels
            .iter()
            .map(|t| {
                Dynamic::object([
                    ("ip_address", Dynamic::from(t.ip_address.as_str())),
                    ("state", Dynamic::from(t.lifecycle_state.as_str())),
                    ("time_created", Dynamic::from(t.time_created.to_string())),
                    ("time_state_modified", Dynamic::from(t.time_state_modified.to_string())),
                ])
            })
            .collect();
        d.set("tunnels", tunnels)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct ShapesDataSource;

#[async_trait]
impl DataSourceCrud for ShapesDataSource {
    type Remote = Vec<Shape>;

    fn type_name(&self) -> &'static str {
        "baremetal_core_shape"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Instance shapes available in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(optional_string("availability_domain"))
            .attribute(optional_string("image_id"))
            .attribute(computed_objects(
                "shapes",
                &[("name", AttributeType::String)],
            ))
            .build()
    }

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData) -> CrudResult<Vec<Shape>> {
        let compartment_id = d.get_string("compartment_id");
        let filter = ShapeFilter {
            availability_domain: d.get_ok_string("availability_domain"),
            image_id: d.get_ok_string("image_id"),
        };
        Ok(collect_pages(list_options(d), |options| {
            client.list_shapes(&compartment_id, filter.clone(), options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<Shape>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let shapes: Vec<Dynamic> = remote
            .iter()
            .map(|s| Dynamic::object([("name", Dynamic::from(s.name.as_str()))]))
            .collect();
        d.set("shapes", shapes)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct VnicAttachmentsDataSource;

#[async_trait]
impl DataSourceCrud for VnicAttachmentsDataSource {
    type Remote = Vec<VnicAttachment>;

    fn type_name(&self) -> &'static str {
        "baremetal_core_vnic_attachments"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("VNIC attachments in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(optional_string("availability_domain"))
            .attribute(optional_string("instance_id"))
            .attribute(optional_string("vnic_id"))
            .attribute(computed_objects(
                "vnic_attachments",
                &[
                    ("availability_domain", AttributeType::String),
                    ("compartment_id", AttributeType::String),
                    ("display_name", AttributeType::String),
                    ("id", AttributeType::String),
                    ("instance_id", AttributeType::String),
                    ("state", AttributeType::String),
                    ("subnet_id", AttributeType::String),
                    ("time_created", AttributeType::String),
                    ("vnic_id", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<VnicAttachment>> {
        let compartment_id = d.get_string("compartment_id");
        let filter = VnicAttachmentFilter {
            availability_domain: d.get_ok_string("availability_domain"),
            instance_id: d.get_ok_string("instance_id"),
            vnic_id: d.get_ok_string("vnic_id"),
        };
        Ok(collect_pages(list_options(d), |options| {
            client.list_vnic_attachments(&compartment_id, filter.clone(), options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<VnicAttachment>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let attachments: Vec<Dynamic> = remote
            .iter()
            .map(|v| {
                Dynamic::object([
                    ("availability_domain", Dynamic::from(v.availability_domain.as_str())),
                    ("compartment_id", Dynamic::from(v.compartment_id.as_str())),
                    ("display_name", Dynamic::from(v.display_name.as_str())),
                    ("id", Dynamic::from(v.id.as_str())),
                    ("instance_id", Dynamic::from(v.instance_id.as_str())),
                    ("state", Dynamic::from(v.lifecycle_state.as_str())),
                    ("subnet_id", Dynamic::from(v.subnet_id.as_str())),
                    ("time_created", Dynamic::from(v.time_created.to_string())),
                    ("vnic_id", Dynamic::from(v.vnic_id.as_str())),
                ])
            })
            .collect();
        d.set("vnic_attachments", attachments)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct VolumeBackupsDataSource;

#[async_trait]
impl DataSourceCrud for VolumeBackupsDataSource {
    type Remote = Vec<VolumeBackup>;

    fn type_name(&self) -> &'static str {
        "baremetal_core_volume_backups"
    }

    fn schema(&self) -> Schema {
        paged(SchemaBuilder::new().description("Block volume backups in a compartment"))
            .attribute(id_attribute())
            .attribute(required_string("compartment_id"))
            .attribute(optional_string("volume_id"))
            .attribute(computed_objects(
                "volume_backups",
                &[
                    ("compartment_id", AttributeType::String),
                    ("display_name", AttributeType::String),
                    ("id", AttributeType::String),
                    ("state", AttributeType::String),
                    ("size_in_mbs", AttributeType::Number),
                    ("time_created", AttributeType::String),
                    ("time_request_received", AttributeType::String),
                    ("volume_id", AttributeType::String),
                ],
            ))
            .build()
    }

    async fn get(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Vec<VolumeBackup>> {
        let compartment_id = d.get_string("compartment_id");
        let volume_id = d.get_ok_string("volume_id");
        Ok(collect_pages(list_options(d), |options| {
            client.list_volume_backups(&compartment_id, volume_id.clone(), options)
        })
        .await?)
    }

    fn set_data(&self, d: &mut ResourceData, remote: &Vec<VolumeBackup>) -> CrudResult<()> {
        d.set_id(synthesized_id());
        let backups: Vec<Dynamic> = remote
            .iter()
            .map(|v| {
                Dynamic::object([
                    ("compartment_id", Dynamic::from(v.compartment_id.as_str())),
                    ("display_name", Dynamic::from(v.display_name.as_str())),
                    ("id", Dynamic::from(v.id.as_str())),
                    ("state", Dynamic::from(v.lifecycle_state.as_str())),
                    ("size_in_mbs", Dynamic::from(v.size_in_mbs)),
                    ("time_created", Dynamic::from(v.time_created.to_string())),
                    (
                        "time_request_received",
                        Dynamic::from(v.time_request_received.map(|t| t.to_string())),
                    ),
                    ("volume_id", Dynamic::from(v.volume_id.as_str())),
                ])
            })
            .collect();
        d.set("volume_backups", backups)?;
        Ok(())
    }
}

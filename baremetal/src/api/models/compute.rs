use crate::api::common::LifecycleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleHistory {
    pub id: String,
    pub availability_domain: String,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: String,
    pub instance_id: String,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConsoleHistoryDetails {
    pub instance_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOption {
    #[serde(rename = "type")]
    pub option_type: String,
    #[serde(default)]
    pub custom_dns_servers: Vec<String>,
    #[serde(default)]
    pub server_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOptions {
    pub id: String,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub options: Vec<DhcpOption>,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
    pub vcn_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGateway {
    pub id: String,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: String,
    pub is_enabled: bool,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
    pub vcn_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelStatus {
    pub ip_address: String,
    pub lifecycle_state: String,
    pub time_created: DateTime<Utc>,
    pub time_state_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpSecConnectionDeviceStatus {
    pub id: String,
    pub compartment_id: String,
    pub time_created: DateTime<Utc>,
    #[serde(default)]
    pub tunnels: Vec<TunnelStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeFilter {
    pub availability_domain: Option<String>,
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnicAttachment {
    pub id: String,
    pub availability_domain: String,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: String,
    pub instance_id: String,
    pub lifecycle_state: LifecycleState,
    pub subnet_id: String,
    pub time_created: DateTime<Utc>,
    pub vnic_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnicAttachmentFilter {
    pub availability_domain: Option<String>,
    pub instance_id: Option<String>,
    pub vnic_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBackup {
    pub id: String,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub size_in_mbs: u64,
    pub time_created: DateTime<Utc>,
    #[serde(default)]
    pub time_request_received: Option<DateTime<Utc>>,
    pub volume_id: String,
}

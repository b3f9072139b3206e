use crate::api::common::LifecycleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseDetails {
    pub admin_password: String,
    pub db_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDbHomeDetails {
    pub db_version: String,
    #[serde(default)]
    pub display_name: String,
    pub database: CreateDatabaseDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSystem {
    pub id: String,
    pub availability_domain: String,
    pub compartment_id: String,
    pub shape: String,
    pub subnet_id: String,
    #[serde(default)]
    pub ssh_public_keys: Vec<String>,
    #[serde(default)]
    pub cpu_core_count: u32,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub database_edition: String,
    /// Only echoed back by launch, never by get
    #[serde(default)]
    pub db_home: Option<CreateDbHomeDetails>,
    #[serde(default)]
    pub disk_redundancy: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub lifecycle_details: String,
    #[serde(default)]
    pub listener_port: u16,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDbSystemDetails {
    pub availability_domain: String,
    pub compartment_id: String,
    pub shape: String,
    pub subnet_id: String,
    pub ssh_public_keys: Vec<String>,
    pub cpu_core_count: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub database_edition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_home: Option<CreateDbHomeDetails>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disk_redundancy: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub id: String,
    pub compartment_id: String,
    pub db_home_id: String,
    pub db_name: String,
    #[serde(default)]
    pub db_unique_name: String,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbHome {
    pub id: String,
    pub compartment_id: String,
    pub db_system_id: String,
    pub db_version: String,
    #[serde(default)]
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbVersion {
    pub version: String,
}

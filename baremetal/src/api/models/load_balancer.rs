use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub drain: bool,
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBackendDetails {
    pub ip_address: String,
    pub port: u16,
    pub weight: u32,
    pub backup: bool,
    pub drain: bool,
    pub offline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBackendDetails {
    pub weight: u32,
    pub backup: bool,
    pub drain: bool,
    pub offline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecker {
    pub protocol: String,
    #[serde(default)]
    pub url_path: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub return_code: u16,
    #[serde(default)]
    pub response_body_regex: String,
    #[serde(default)]
    pub interval_in_millis: u32,
    #[serde(default)]
    pub timeout_in_millis: u32,
    #[serde(default)]
    pub retries: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslConfiguration {
    pub certificate_name: String,
    #[serde(default)]
    pub verify_depth: u32,
    #[serde(default)]
    pub verify_peer_certificate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSet {
    pub name: String,
    pub policy: String,
    #[serde(default)]
    pub backends: Vec<Backend>,
    pub health_checker: HealthChecker,
    #[serde(default)]
    pub ssl_configuration: Option<SslConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBackendSetDetails {
    pub name: String,
    pub policy: String,
    pub health_checker: HealthChecker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_configuration: Option<SslConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBackendSetDetails {
    pub policy: String,
    pub backends: Vec<CreateBackendDetails>,
    pub health_checker: HealthChecker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_configuration: Option<SslConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerShape {
    pub name: String,
}

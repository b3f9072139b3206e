//! The SDK client capability
//!
//! Everything the provider needs from Oracle Bare Metal Cloud goes through
//! `BareMetalClient`. The HTTP transport and request signing live behind
//! this trait; the provider only sees typed requests and responses.

use crate::api::common::{ListOptions, Page};
use crate::api::error::ApiError;
use crate::api::models::*;
use async_trait::async_trait;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Load balancer mutations return the id of the work request that tracks
/// them; everything else answers synchronously or exposes its own
/// lifecycle state.
#[async_trait]
pub trait BareMetalClient: Send + Sync {
    // Load balancer
    async fn get_work_request(&self, work_request_id: &str) -> ApiResult<WorkRequest>;

    async fn create_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: CreateBackendDetails,
    ) -> ApiResult<String>;

    async fn get_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
    ) -> ApiResult<Backend>;

    async fn update_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        details: UpdateBackendDetails,
    ) -> ApiResult<String>;

    async fn delete_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
    ) -> ApiResult<String>;

    async fn create_backend_set(
        &self,
        load_balancer_id: &str,
        details: CreateBackendSetDetails,
    ) -> ApiResult<String>;

    async fn get_backend_set(&self, load_balancer_id: &str, name: &str) -> ApiResult<BackendSet>;

    async fn update_backend_set(
        &self,
        load_balancer_id: &str,
        name: &str,
        details: UpdateBackendSetDetails,
    ) -> ApiResult<String>;

    async fn delete_backend_set(&self, load_balancer_id: &str, name: &str) -> ApiResult<String>;

    async fn list_load_balancer_shapes(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<LoadBalancerShape>>;

    // Object storage
    async fn get_namespace(&self) -> ApiResult<String>;

    async fn create_bucket(&self, namespace: &str, details: CreateBucketDetails)
        -> ApiResult<Bucket>;

    async fn get_bucket(&self, namespace: &str, name: &str) -> ApiResult<Bucket>;

    async fn update_bucket(
        &self,
        namespace: &str,
        name: &str,
        details: UpdateBucketDetails,
    ) -> ApiResult<Bucket>;

    async fn delete_bucket(&self, namespace: &str, name: &str) -> ApiResult<()>;

    async fn put_object(
        &self,
        namespace: &str,
        bucket: &str,
        name: &str,
        details: PutObjectDetails,
    ) -> ApiResult<Object>;

    async fn get_object(&self, namespace: &str, bucket: &str, name: &str) -> ApiResult<Object>;

    async fn head_object(&self, namespace: &str, bucket: &str, name: &str)
        -> ApiResult<HeadObject>;

    async fn delete_object(&self, namespace: &str, bucket: &str, name: &str) -> ApiResult<()>;

    // Core
    async fn capture_console_history(
        &self,
        details: CaptureConsoleHistoryDetails,
    ) -> ApiResult<ConsoleHistory>;

    async fn get_console_history(&self, id: &str) -> ApiResult<ConsoleHistory>;

    async fn delete_console_history(&self, id: &str) -> ApiResult<()>;

    async fn list_dhcp_options(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DhcpOptions>>;

    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<InternetGateway>>;

    async fn get_ipsec_connection_device_status(
        &self,
        ipsec_id: &str,
    ) -> ApiResult<IpSecConnectionDeviceStatus>;

    async fn list_shapes(
        &self,
        compartment_id: &str,
        filter: ShapeFilter,
        options: ListOptions,
    ) -> ApiResult<Page<Shape>>;

    async fn list_vnic_attachments(
        &self,
        compartment_id: &str,
        filter: VnicAttachmentFilter,
        options: ListOptions,
    ) -> ApiResult<Page<VnicAttachment>>;

    async fn list_volume_backups(
        &self,
        compartment_id: &str,
        volume_id: Option<String>,
        options: ListOptions,
    ) -> ApiResult<Page<VolumeBackup>>;

    // Database
    async fn launch_db_system(&self, details: LaunchDbSystemDetails) -> ApiResult<DbSystem>;

    async fn get_db_system(&self, id: &str) -> ApiResult<DbSystem>;

    async fn terminate_db_system(&self, id: &str) -> ApiResult<()>;

    async fn list_db_systems(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DbSystem>>;

    async fn get_database(&self, id: &str) -> ApiResult<Database>;

    async fn get_db_home(&self, id: &str) -> ApiResult<DbHome>;

    async fn list_db_versions(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DbVersion>>;

    // Identity
    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> ApiResult<Vec<AvailabilityDomain>>;

    async fn list_groups(&self, compartment_id: &str, options: ListOptions)
        -> ApiResult<Page<Group>>;

    async fn list_policies(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<Policy>>;

    async fn list_users(&self, compartment_id: &str, options: ListOptions) -> ApiResult<Page<User>>;
}

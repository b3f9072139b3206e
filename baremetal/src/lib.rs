//! Terraform provider for Oracle Bare Metal Cloud
//!
//! The provider resolves its configuration, asks the caller-supplied
//! [`ClientFactory`] for an SDK client and hands that client to every resource
//! and data source through [`BareMetalProviderData`].

pub mod api;
pub mod config;
pub mod crud;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

use api::{ApiError, BareMetalClient};
use async_trait::async_trait;
use config::ProviderConfig;
use crud::{DataSourceAdapter, DataSourceCrud, ResourceAdapter, ResourceCrud};
use provider_data::BareMetalProviderData;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, ProviderSchemaRequest,
    ProviderSchemaResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::Diagnostic;
use tfplug::{
    Context, DataSourceFactory, DataSourceWithConfigure, PollPolicy, Provider, ResourceFactory,
    ResourceWithConfigure,
};
use tracing::{debug, info};

/// Builds the SDK client from the resolved provider configuration
pub type ClientFactory =
    Arc<dyn Fn(&ProviderConfig) -> Result<Arc<dyn BareMetalClient>, ApiError> + Send + Sync>;

pub struct BareMetalProvider {
    client_factory: ClientFactory,
    poll_policy: PollPolicy,
    config: Option<ProviderConfig>,
}

impl BareMetalProvider {
    pub fn new(client_factory: ClientFactory) -> Self {
        Self {
            client_factory,
            poll_policy: PollPolicy::default(),
            config: None,
        }
    }

    /// A provider that hands out the same client regardless of configuration
    pub fn with_client(client: Arc<dyn BareMetalClient>) -> Self {
        Self::new(Arc::new(
            move |_config: &ProviderConfig| -> Result<Arc<dyn BareMetalClient>, ApiError> {
                Ok(client.clone())
            },
        ))
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    /// Configuration accepted by the last successful `configure`
    pub fn config(&self) -> Option<&ProviderConfig> {
        self.config.as_ref()
    }
}

fn resource_factory<C: ResourceCrud>() -> Box<dyn ResourceWithConfigure> {
    Box::new(ResourceAdapter::<C>::new())
}

fn data_source_factory<C: DataSourceCrud>() -> Box<dyn DataSourceWithConfigure> {
    Box::new(DataSourceAdapter::<C>::new())
}

fn register_resource<C: ResourceCrud>(resources: &mut HashMap<String, ResourceFactory>) {
    resources.insert(C::default().type_name().to_string(), resource_factory::<C>);
}

fn register_data_source<C: DataSourceCrud>(data_sources: &mut HashMap<String, DataSourceFactory>) {
    data_sources.insert(
        C::default().type_name().to_string(),
        data_source_factory::<C>,
    );
}

#[async_trait]
impl Provider for BareMetalProvider {
    fn type_name(&self) -> &str {
        "baremetal"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        let string = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .description(description)
                .optional()
        };

        ProviderSchemaResponse {
            schema: SchemaBuilder::new()
                .attribute(string(config::TENANCY_OCID, "OCID of the tenancy").build())
                .attribute(string(config::USER_OCID, "OCID of the API user").build())
                .attribute(
                    string(config::FINGERPRINT, "Fingerprint of the API signing key").build(),
                )
                .attribute(
                    string(
                        config::PRIVATE_KEY_PATH,
                        "Path to the PEM encoded API signing key",
                    )
                    .build(),
                )
                .attribute(
                    string(config::PRIVATE_KEY, "PEM encoded API signing key")
                        .sensitive()
                        .build(),
                )
                .attribute(
                    string(
                        config::PRIVATE_KEY_PASSWORD,
                        "Passphrase of the API signing key",
                    )
                    .sensitive()
                    .build(),
                )
                .attribute(
                    string(
                        config::REGION,
                        "Region to manage resources in, us-phoenix-1 by default",
                    )
                    .build(),
                )
                .build(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = match ProviderConfig::from_config(&request.config) {
            Ok(config) => config,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    provider_data: None,
                    diagnostics,
                }
            }
        };
        debug!(?config, "Resolved provider configuration");

        let client = match (self.client_factory)(&config) {
            Ok(client) => client,
            Err(e) => {
                return ConfigureProviderResponse {
                    provider_data: None,
                    diagnostics: vec![Diagnostic::error(
                        "Failed to create API client",
                        e.to_string(),
                    )],
                }
            }
        };

        info!(region = %config.region, "Configured baremetal provider");
        let data = BareMetalProviderData::new(client).with_poll_policy(self.poll_policy);
        self.config = Some(config);

        ConfigureProviderResponse {
            provider_data: Some(Arc::new(data)),
            diagnostics: vec![],
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        use crate::resources::*;

        let mut factories = HashMap::new();
        register_resource::<ConsoleHistoryResource>(&mut factories);
        register_resource::<DbSystemResource>(&mut factories);
        register_resource::<BackendResource>(&mut factories);
        register_resource::<BackendSetResource>(&mut factories);
        register_resource::<BucketResource>(&mut factories);
        register_resource::<ObjectResource>(&mut factories);
        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        use crate::data_sources::*;

        let mut factories = HashMap::new();
        register_data_source::<DhcpOptionsDataSource>(&mut factories);
        register_data_source::<InternetGatewaysDataSource>(&mut factories);
        register_data_source::<IpSecStatusDataSource>(&mut factories);
        register_data_source::<ShapesDataSource>(&mut factories);
        register_data_source::<VnicAttachmentsDataSource>(&mut factories);
        register_data_source::<VolumeBackupsDataSource>(&mut factories);
        register_data_source::<DatabaseDataSource>(&mut factories);
        register_data_source::<DbHomeDataSource>(&mut factories);
        register_data_source::<DbSystemsDataSource>(&mut factories);
        register_data_source::<DbVersionsDataSource>(&mut factories);
        register_data_source::<AvailabilityDomainsDataSource>(&mut factories);
        register_data_source::<GroupsDataSource>(&mut factories);
        register_data_source::<PoliciesDataSource>(&mut factories);
        register_data_source::<UsersDataSource>(&mut factories);
        register_data_source::<LoadBalancerShapesDataSource>(&mut factories);
        register_data_source::<NamespaceDataSource>(&mut factories);
        register_data_source::<ObjectHeadDataSource>(&mut factories);
        factories
    }
}

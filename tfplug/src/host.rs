//! In-process provider host
//!
//! `ProviderHost` plays Terraform's part in the plugin conversation: it
//! configures the provider once, then for each operation looks up the
//! resource or data source factory by type name, hands the instance the
//! provider data, prepares the configuration (defaults, schema validation,
//! custom validation) and turns error diagnostics into `TfplugError`.

use crate::context::Context;
use crate::data_source::{
    ConfigureDataSourceRequest, DataSourceSchemaRequest, DataSourceWithConfigure,
    ReadDataSourceRequest, ValidateDataSourceConfigRequest,
};
use crate::error::{Result, TfplugError};
use crate::provider::{
    ConfigureProviderRequest, DataSourceFactory, Provider, ProviderSchemaRequest, ResourceFactory,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
    ImportResourceStateRequest, ReadResourceRequest, ResourceSchemaRequest, ResourceWithConfigure,
    UpdateResourceRequest, ValidateResourceConfigRequest,
};
use crate::schema::Schema;
use crate::types::{has_errors, AttributePath, Diagnostic, DynamicValue};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of planning a change to an existing resource
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub planned_state: DynamicValue,
    /// Force-new attributes whose value changed
    pub requires_replace: Vec<AttributePath>,
}

impl PlannedChange {
    pub fn requires_replacement(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

pub struct ProviderHost<P: Provider> {
    provider: P,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
    resources: HashMap<String, ResourceFactory>,
    data_sources: HashMap<String, DataSourceFactory>,
}

impl<P: Provider> ProviderHost<P> {
    pub fn new(provider: P) -> Self {
        let resources = provider.resources();
        let data_sources = provider.data_sources();

        Self {
            provider,
            provider_data: None,
            resources,
            data_sources,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    pub fn resource_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn data_source_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configure the provider from its block; values missing from the block
    /// may still be filled in by the provider (environment fallbacks)
    pub async fn configure(&mut self, ctx: Context, mut config: DynamicValue) -> Result<()> {
        let schema = self
            .provider
            .schema(ctx.clone(), ProviderSchemaRequest)
            .await;
        check(schema.diagnostics)?;

        schema.schema.apply_defaults(&mut config);
        check(schema.schema.validate(&config))?;

        let response = self
            .provider
            .configure(ctx, ConfigureProviderRequest { config })
            .await;
        check(response.diagnostics)?;

        self.provider_data = response.provider_data;
        tracing::info!(provider = self.provider.type_name(), "provider configured");
        Ok(())
    }

    pub async fn resource_schema(&self, ctx: Context, type_name: &str) -> Result<Schema> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| TfplugError::ResourceNotFound(type_name.to_string()))?;
        let resource = factory();
        let response = resource.schema(ctx, ResourceSchemaRequest).await;
        check(response.diagnostics)?;
        Ok(response.schema)
    }

    pub async fn data_source_schema(&self, ctx: Context, type_name: &str) -> Result<Schema> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| TfplugError::DataSourceNotFound(type_name.to_string()))?;
        let data_source = factory();
        let response = data_source.schema(ctx, DataSourceSchemaRequest).await;
        check(response.diagnostics)?;
        Ok(response.schema)
    }

    /// Apply defaults and validate a resource configuration
    pub async fn validate_resource(
        &self,
        ctx: Context,
        type_name: &str,
        config: DynamicValue,
    ) -> Result<DynamicValue> {
        let resource = self.resource(ctx.clone(), type_name).await?;
        prepare_resource_config(ctx, resource.as_ref(), config).await
    }

    /// Validated planned state for a change from `prior`, with the force-new
    /// attributes that changed
    pub async fn plan_resource(
        &self,
        ctx: Context,
        type_name: &str,
        prior: &DynamicValue,
        config: DynamicValue,
    ) -> Result<PlannedChange> {
        let resource = self.resource(ctx.clone(), type_name).await?;
        let mut planned_state =
            prepare_resource_config(ctx.clone(), resource.as_ref(), config).await?;
        let schema = resource.schema(ctx, ResourceSchemaRequest).await;
        schema.schema.carry_computed(prior, &mut planned_state);

        Ok(PlannedChange {
            requires_replace: schema.schema.requires_replace(prior, &planned_state),
            planned_state,
        })
    }

    pub async fn create(
        &self,
        ctx: Context,
        type_name: &str,
        config: DynamicValue,
    ) -> Result<DynamicValue> {
        let resource = self.resource(ctx.clone(), type_name).await?;
        let config = prepare_resource_config(ctx.clone(), resource.as_ref(), config).await?;

        tracing::debug!(type_name, "creating resource");
        let response = resource
            .create(
                ctx,
                CreateResourceRequest {
                    type_name: type_name.to_string(),
                    planned_state: config.clone(),
                    config,
                },
            )
            .await;
        if has_errors(&response.diagnostics) && has_id(&response.new_state) {
            tracing::warn!(type_name, "create failed after the resource was created");
            return Err(TfplugError::PartialApply {
                state: response.new_state,
                diagnostics: response.diagnostics,
            });
        }
        check(response.diagnostics)?;
        Ok(response.new_state)
    }

    /// Refresh; `None` means the resource is gone and should leave the state
    pub async fn read(
        &self,
        ctx: Context,
        type_name: &str,
        current_state: DynamicValue,
    ) -> Result<Option<DynamicValue>> {
        let resource = self.resource(ctx.clone(), type_name).await?;

        tracing::debug!(type_name, "reading resource");
        let response = resource
            .read(
                ctx,
                ReadResourceRequest {
                    type_name: type_name.to_string(),
                    current_state,
                },
            )
            .await;
        check(response.diagnostics)?;
        Ok(response.new_state)
    }

    pub async fn update(
        &self,
        ctx: Context,
        type_name: &str,
        prior_state: DynamicValue,
        config: DynamicValue,
    ) -> Result<DynamicValue> {
        let resource = self.resource(ctx.clone(), type_name).await?;
        let config = prepare_resource_config(ctx.clone(), resource.as_ref(), config).await?;
        let mut planned_state = config.clone();
        resource
            .schema(ctx.clone(), ResourceSchemaRequest)
            .await
            .schema
            .carry_computed(&prior_state, &mut planned_state);

        tracing::debug!(type_name, "updating resource");
        let response = resource
            .update(
                ctx,
                UpdateResourceRequest {
                    type_name: type_name.to_string(),
                    prior_state,
                    planned_state,
                    config,
                },
            )
            .await;
        check(response.diagnostics)?;
        Ok(response.new_state)
    }

    pub async fn delete(
        &self,
        ctx: Context,
        type_name: &str,
        prior_state: DynamicValue,
    ) -> Result<()> {
        let resource = self.resource(ctx.clone(), type_name).await?;

        tracing::debug!(type_name, "deleting resource");
        let response = resource
            .delete(
                ctx,
                DeleteResourceRequest {
                    type_name: type_name.to_string(),
                    prior_state,
                },
            )
            .await;
        check(response.diagnostics)
    }

    /// Import by id, then read each imported resource to fill in its state
    pub async fn import(
        &self,
        ctx: Context,
        type_name: &str,
        id: &str,
    ) -> Result<Vec<DynamicValue>> {
        let resource = self.resource(ctx.clone(), type_name).await?;

        tracing::debug!(type_name, id, "importing resource");
        let response = resource
            .import_state(
                ctx.clone(),
                ImportResourceStateRequest {
                    type_name: type_name.to_string(),
                    id: id.to_string(),
                },
            )
            .await;
        check(response.diagnostics)?;

        let mut states = Vec::with_capacity(response.imported_resources.len());
        for imported in response.imported_resources {
            match self
                .read(ctx.clone(), &imported.type_name, imported.state)
                .await?
            {
                Some(state) => states.push(state),
                None => {
                    return Err(TfplugError::ImportFailed(format!(
                        "{} {} does not exist",
                        imported.type_name, id
                    )))
                }
            }
        }
        Ok(states)
    }

    pub async fn read_data_source(
        &self,
        ctx: Context,
        type_name: &str,
        mut config: DynamicValue,
    ) -> Result<DynamicValue> {
        let data_source = self.data_source(ctx.clone(), type_name).await?;

        let schema = data_source
            .schema(ctx.clone(), DataSourceSchemaRequest)
            .await;
        check(schema.diagnostics)?;
        schema.schema.apply_defaults(&mut config);
        check(schema.schema.validate(&config))?;

        let validation = data_source
            .validate(
                ctx.clone(),
                ValidateDataSourceConfigRequest {
                    type_name: type_name.to_string(),
                    config: config.clone(),
                },
            )
            .await;
        check(validation.diagnostics)?;

        tracing::debug!(type_name, "reading data source");
        let response = data_source
            .read(
                ctx,
                ReadDataSourceRequest {
                    type_name: type_name.to_string(),
                    config,
                },
            )
            .await;
        check(response.diagnostics)?;
        Ok(response.state)
    }

    async fn resource(
        &self,
        ctx: Context,
        type_name: &str,
    ) -> Result<Box<dyn ResourceWithConfigure>> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| TfplugError::ResourceNotFound(type_name.to_string()))?;
        let provider_data = self
            .provider_data
            .clone()
            .ok_or(TfplugError::ProviderNotConfigured)?;

        let mut resource = factory();
        let response = resource
            .configure(
                ctx,
                ConfigureResourceRequest {
                    provider_data: Some(provider_data),
                },
            )
            .await;
        check(response.diagnostics)?;
        Ok(resource)
    }

    async fn data_source(
        &self,
        ctx: Context,
        type_name: &str,
    ) -> Result<Box<dyn DataSourceWithConfigure>> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| TfplugError::DataSourceNotFound(type_name.to_string()))?;
        let provider_data = self
            .provider_data
            .clone()
            .ok_or(TfplugError::ProviderNotConfigured)?;

        let mut data_source = factory();
        let response = data_source
            .configure(
                ctx,
                ConfigureDataSourceRequest {
                    provider_data: Some(provider_data),
                },
            )
            .await;
        check(response.diagnostics)?;
        Ok(data_source)
    }
}

async fn prepare_resource_config(
    ctx: Context,
    resource: &dyn ResourceWithConfigure,
    mut config: DynamicValue,
) -> Result<DynamicValue> {
    let schema = resource.schema(ctx.clone(), ResourceSchemaRequest).await;
    check(schema.diagnostics)?;

    schema.schema.apply_defaults(&mut config);
    check(schema.schema.validate(&config))?;

    let validation = resource
        .validate(
            ctx,
            ValidateResourceConfigRequest {
                type_name: resource.type_name().to_string(),
                config: config.clone(),
            },
        )
        .await;
    check(validation.diagnostics)?;

    Ok(config)
}

fn has_id(state: &DynamicValue) -> bool {
    state
        .get_string(&AttributePath::new("id"))
        .is_ok_and(|id| !id.is_empty())
}

/// Log warnings and fail on any error diagnostic
fn check(diagnostics: Vec<Diagnostic>) -> Result<()> {
    for diag in diagnostics.iter().filter(|d| !d.is_error()) {
        tracing::warn!(summary = %diag.summary, detail = %diag.detail, "provider warning");
    }
    if has_errors(&diagnostics) {
        return Err(TfplugError::Diagnostics(diagnostics));
    }
    Ok(())
}

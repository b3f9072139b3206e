//! Bridges `ResourceCrud` / `DataSourceCrud` implementations onto the
//! framework's `Resource` and `DataSource` traits

use crate::crud::{
    create_resource, delete_resource, read_data_source, read_resource, update_resource, CrudError,
    DataSourceCrud, ResourceCrud,
};
use crate::provider_data::BareMetalProviderData;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::types::{AttributePath, Diagnostic};
use tfplug::ResourceData;

fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

fn failure(op: &str, type_name: &str, err: CrudError) -> Diagnostic {
    Diagnostic::error(format!("Failed to {} {}", op, type_name), err.to_string())
}

fn extract_provider_data(
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
) -> Result<BareMetalProviderData, Diagnostic> {
    let data = provider_data.ok_or_else(|| {
        Diagnostic::error(
            "No provider data",
            "No provider data was provided to the resource",
        )
    })?;
    data.downcast_ref::<BareMetalProviderData>()
        .cloned()
        .ok_or_else(|| {
            Diagnostic::error(
                "Invalid provider data",
                "Failed to extract BareMetalProviderData from provider data",
            )
        })
}

/// A framework resource driven by one `ResourceCrud` implementation
#[derive(Default)]
pub struct ResourceAdapter<C: ResourceCrud> {
    crud: C,
    provider_data: Option<BareMetalProviderData>,
}

impl<C: ResourceCrud> ResourceAdapter<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<C: ResourceCrud> Resource for ResourceAdapter<C> {
    fn type_name(&self) -> &str {
        self.crud.type_name()
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: self.crud.schema(),
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let Some(data) = &self.provider_data else {
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![not_configured()],
            };
        };

        let mut d = ResourceData::from_state(request.planned_state.clone());
        let result = create_resource(
            &self.crud,
            &ctx,
            data.client.as_ref(),
            &data.poll_policy,
            &mut d,
        )
        .await;

        match result {
            Ok(()) => CreateResourceResponse {
                new_state: d.values().clone(),
                diagnostics: vec![],
            },
            // Once the remote object has an id it must stay in state
            Err(e) if !d.id().is_empty() => CreateResourceResponse {
                new_state: d.values().clone(),
                diagnostics: vec![failure("create", self.crud.type_name(), e)],
            },
            Err(e) => CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![failure("create", self.crud.type_name(), e)],
            },
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let Some(data) = &self.provider_data else {
            return ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![not_configured()],
            };
        };

        let mut d = ResourceData::from_state(request.current_state.clone());
        match read_resource(&self.crud, data.client.as_ref(), &mut d).await {
            Ok(()) => ReadResourceResponse {
                new_state: d.into_state(),
                diagnostics: vec![],
            },
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![failure("read", self.crud.type_name(), e)],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let Some(data) = &self.provider_data else {
            return UpdateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![not_configured()],
            };
        };

        let mut d = ResourceData::from_state(request.planned_state.clone());
        if d.id().is_empty() {
            let prior = ResourceData::from_state(request.prior_state);
            d.set_id(prior.id());
        }

        let result = update_resource(
            &self.crud,
            &ctx,
            data.client.as_ref(),
            &data.poll_policy,
            &mut d,
        )
        .await;

        match result {
            Ok(()) => UpdateResourceResponse {
                new_state: d.values().clone(),
                diagnostics: vec![],
            },
            Err(e) => UpdateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![failure("update", self.crud.type_name(), e)],
            },
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let Some(data) = &self.provider_data else {
            return DeleteResourceResponse {
                diagnostics: vec![not_configured()],
            };
        };

        let mut d = ResourceData::from_state(request.prior_state);
        let result = delete_resource(
            &self.crud,
            &ctx,
            data.client.as_ref(),
            &data.poll_policy,
            &mut d,
        )
        .await;

        DeleteResourceResponse {
            diagnostics: result
                .err()
                .map(|e| failure("delete", self.crud.type_name(), e))
                .into_iter()
                .collect(),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        if self.crud.importable() {
            import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        } else {
            response.diagnostics.push(Diagnostic::error(
                "Resource Import Not Implemented",
                format!("{} does not support import", request.type_name),
            ));
        }

        response
    }
}

#[async_trait]
impl<C: ResourceCrud> ResourceWithConfigure for ResourceAdapter<C> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        match extract_provider_data(request.provider_data) {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }

        ConfigureResourceResponse { diagnostics }
    }
}

/// A framework data source driven by one `DataSourceCrud` implementation
#[derive(Default)]
pub struct DataSourceAdapter<C: DataSourceCrud> {
    crud: C,
    provider_data: Option<BareMetalProviderData>,
}

impl<C: DataSourceCrud> DataSourceAdapter<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<C: DataSourceCrud> DataSource for DataSourceAdapter<C> {
    fn type_name(&self) -> &str {
        self.crud.type_name()
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: self.crud.schema(),
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(data) = &self.provider_data else {
            return ReadDataSourceResponse {
                state: request.config,
                diagnostics: vec![not_configured()],
            };
        };

        let mut d = ResourceData::from_state(request.config.clone());
        match read_data_source(&self.crud, data.client.as_ref(), &mut d).await {
            Ok(()) => ReadDataSourceResponse {
                state: d.values().clone(),
                diagnostics: vec![],
            },
            Err(e) => ReadDataSourceResponse {
                state: request.config,
                diagnostics: vec![failure("read", self.crud.type_name(), e)],
            },
        }
    }
}

#[async_trait]
impl<C: DataSourceCrud> DataSourceWithConfigure for DataSourceAdapter<C> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let mut diagnostics = vec![];

        match extract_provider_data(request.provider_data) {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }

        ConfigureDataSourceResponse { diagnostics }
    }
}

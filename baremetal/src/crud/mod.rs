//! Generic CRUD machinery shared by every resource and data source
//!
//! Each resource kind implements the small `ResourceCrud` trait: how to
//! create, get, update and delete its remote object through the SDK and how
//! to project that object into Terraform state. The free functions here
//! drive those hooks, wait for asynchronous mutations to settle, and map
//! not-found responses onto Terraform's "resource is gone" semantics.

pub mod adapter;
pub mod error;
pub mod paging;
pub mod wait;

pub use adapter::{DataSourceAdapter, ResourceAdapter};
pub use error::{CrudError, CrudResult};
pub use paging::{collect_pages, list_options};
pub use wait::{wait_for_state, wait_for_work_request, Classification, PollState, StateSets};

use crate::api::models::WorkRequest;
use crate::api::{BareMetalClient, LifecycleState};
use async_trait::async_trait;
use std::time::Duration;
use tfplug::schema::Schema;
use tfplug::{Context, PollPolicy, ResourceData, ResourceTimeouts, TfplugError};
use tracing::{debug, info, warn};

/// The outcome of a mutating SDK call
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    /// The call finished synchronously, optionally returning the object
    Done(Option<R>),
    /// Poll this work request before reading the object back
    WorkRequest(String),
    /// Poll the object's own lifecycle state; the snapshot carries its id
    Lifecycle(Option<R>),
}

#[async_trait]
pub trait ResourceCrud: Default + Send + Sync + 'static {
    type Remote: Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// The identifier stored in state, derived from the declared values and
    /// the remote object when one is available
    fn id(&self, d: &ResourceData, remote: Option<&Self::Remote>) -> String;

    fn timeouts(&self) -> ResourceTimeouts {
        ResourceTimeouts::default()
    }

    async fn create(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Self::Remote>>;

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData)
        -> CrudResult<Self::Remote>;

    /// Resources whose attributes all force replacement never update in place
    async fn update(
        &self,
        _client: &dyn BareMetalClient,
        _d: &ResourceData,
    ) -> CrudResult<Mutation<Self::Remote>> {
        Ok(Mutation::Done(None))
    }

    async fn delete(
        &self,
        client: &dyn BareMetalClient,
        d: &ResourceData,
    ) -> CrudResult<Mutation<Self::Remote>>;

    /// Copy the remote object into state
    fn set_data(&self, d: &mut ResourceData, remote: &Self::Remote) -> CrudResult<()>;

    /// Called once a create or update work request has succeeded
    fn record_work_request(
        &self,
        _d: &mut ResourceData,
        _work_request: &WorkRequest,
    ) -> CrudResult<()> {
        Ok(())
    }

    fn lifecycle_state(&self, _remote: &Self::Remote) -> Option<LifecycleState> {
        None
    }

    fn created_states(&self) -> StateSets<LifecycleState> {
        StateSets::created()
    }

    fn updated_states(&self) -> StateSets<LifecycleState> {
        StateSets::updated()
    }

    fn deleted_states(&self) -> StateSets<LifecycleState> {
        StateSets::deleted()
    }

    /// Whether `terraform import` may seed state from a bare id
    fn importable(&self) -> bool {
        false
    }
}

pub async fn create_resource<C: ResourceCrud>(
    crud: &C,
    ctx: &Context,
    client: &dyn BareMetalClient,
    policy: &PollPolicy,
    d: &mut ResourceData,
) -> CrudResult<()> {
    let missing = crud.schema().missing_required(d.values());
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        return Err(CrudError::MissingAttribute(names.join(", ")));
    }

    info!(type_name = crud.type_name(), "Creating resource");
    let mutation = crud.create(client, d).await?;
    let remote = settle(
        crud,
        ctx,
        client,
        policy,
        d,
        mutation,
        crud.created_states(),
        crud.timeouts().create,
    )
    .await?;

    let id = crud.id(d, Some(&remote));
    d.set_id(id);
    project(crud, d, Some(&remote))
}

/// Refresh state from the remote object. A missing object, or one whose
/// lifecycle already reached a deleted state, clears the id so the
/// resource drops out of state.
pub async fn read_resource<C: ResourceCrud>(
    crud: &C,
    client: &dyn BareMetalClient,
    d: &mut ResourceData,
) -> CrudResult<()> {
    match crud.get(client, d).await {
        Ok(remote) => {
            let gone = crud
                .lifecycle_state(&remote)
                .is_some_and(|s| crud.deleted_states().target.contains(&s));
            if gone {
                warn!(
                    type_name = crud.type_name(),
                    id = %d.id(),
                    "Resource has been deleted, removing from state"
                );
                d.set_id("");
                return Ok(());
            }
            project(crud, d, Some(&remote))
        }
        Err(e) if e.is_not_found() => {
            warn!(
                type_name = crud.type_name(),
                id = %d.id(),
                error = %e,
                "Resource not found, removing from state"
            );
            d.set_id("");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Send the full desired configuration and project the result
pub async fn update_resource<C: ResourceCrud>(
    crud: &C,
    ctx: &Context,
    client: &dyn BareMetalClient,
    policy: &PollPolicy,
    d: &mut ResourceData,
) -> CrudResult<()> {
    info!(type_name = crud.type_name(), id = %d.id(), "Updating resource");
    let mutation = crud.update(client, d).await?;
    let remote = settle(
        crud,
        ctx,
        client,
        policy,
        d,
        mutation,
        crud.updated_states(),
        crud.timeouts().update,
    )
    .await?;
    project(crud, d, Some(&remote))
}

pub async fn delete_resource<C: ResourceCrud>(
    crud: &C,
    ctx: &Context,
    client: &dyn BareMetalClient,
    policy: &PollPolicy,
    d: &mut ResourceData,
) -> CrudResult<()> {
    info!(type_name = crud.type_name(), id = %d.id(), "Deleting resource");
    let timeout = crud.timeouts().delete;

    match crud.delete(client, d).await {
        Ok(Mutation::Done(_)) => {}
        Ok(Mutation::WorkRequest(id)) => {
            wait_for_work_request(ctx, client, &id, policy, timeout).await?;
        }
        Ok(Mutation::Lifecycle(_)) => {
            let sets = crud.deleted_states();
            match poll_lifecycle(crud, ctx, client, policy, d, &sets, timeout).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        Err(e) if e.is_not_found() => {
            debug!(type_name = crud.type_name(), id = %d.id(), "Resource already deleted");
        }
        Err(e) => return Err(e),
    }

    d.set_id("");
    Ok(())
}

/// Write the remote object into state; `None` leaves state untouched
pub fn project<C: ResourceCrud>(
    crud: &C,
    d: &mut ResourceData,
    remote: Option<&C::Remote>,
) -> CrudResult<()> {
    match remote {
        Some(remote) => crud.set_data(d, remote),
        None => Ok(()),
    }
}

/// Resolve a mutation to the remote object it produced
#[allow(clippy::too_many_arguments)]
async fn settle<C: ResourceCrud>(
    crud: &C,
    ctx: &Context,
    client: &dyn BareMetalClient,
    policy: &PollPolicy,
    d: &mut ResourceData,
    mutation: Mutation<C::Remote>,
    sets: StateSets<LifecycleState>,
    timeout: Duration,
) -> CrudResult<C::Remote> {
    match mutation {
        Mutation::Done(Some(remote)) => Ok(remote),
        Mutation::Done(None) => crud.get(client, d).await,
        Mutation::WorkRequest(id) => {
            let work_request = wait_for_work_request(ctx, client, &id, policy, timeout).await?;
            crud.record_work_request(d, &work_request)?;
            crud.get(client, d).await
        }
        Mutation::Lifecycle(snapshot) => {
            if let Some(remote) = &snapshot {
                let id = crud.id(d, Some(remote));
                d.set_id(id);
            }
            poll_lifecycle(crud, ctx, client, policy, d, &sets, timeout).await
        }
    }
}

async fn poll_lifecycle<C: ResourceCrud>(
    crud: &C,
    ctx: &Context,
    client: &dyn BareMetalClient,
    policy: &PollPolicy,
    d: &ResourceData,
    sets: &StateSets<LifecycleState>,
    timeout: Duration,
) -> CrudResult<C::Remote> {
    wait_for_state(ctx, sets, policy, timeout, move || async move {
        let remote = crud.get(client, d).await?;
        let state = crud
            .lifecycle_state(&remote)
            .unwrap_or(LifecycleState::Unknown);
        Ok((remote, state))
    })
    .await
}

#[async_trait]
pub trait DataSourceCrud: Default + Send + Sync + 'static {
    type Remote: Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn get(&self, client: &dyn BareMetalClient, d: &ResourceData)
        -> CrudResult<Self::Remote>;

    /// Copy the result into state, including the id
    fn set_data(&self, d: &mut ResourceData, remote: &Self::Remote) -> CrudResult<()>;
}

pub async fn read_data_source<C: DataSourceCrud>(
    crud: &C,
    client: &dyn BareMetalClient,
    d: &mut ResourceData,
) -> CrudResult<()> {
    debug!(type_name = crud.type_name(), "Reading data source");
    let remote = crud.get(client, d).await?;
    crud.set_data(d, &remote)
}

/// Id for data sources whose results have no natural identifier
pub fn synthesized_id() -> String {
    chrono::Utc::now().to_string()
}

/// Read an integer attribute into a narrower type; unset reads as zero
pub fn get_int_as<T: TryFrom<i64>>(d: &ResourceData, key: &str) -> CrudResult<T> {
    let value = d.get_int(key);
    T::try_from(value).map_err(|_| {
        CrudError::State(TfplugError::TypeMismatch {
            attribute: key.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            actual: value.to_string(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::models::Bucket;
    use crate::api::testing::FakeClient;
    use crate::resources::BucketResource;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashMap;
    use tfplug::DynamicValue;

    fn bucket() -> Bucket {
        Bucket {
            namespace: "acme".to_string(),
            name: "logs".to_string(),
            compartment_id: "ocid1.compartment.oc1..c".to_string(),
            metadata: HashMap::from([("team".to_string(), "infra".to_string())]),
            created_by: "ocid1.user.oc1..u".to_string(),
            time_created: Utc::now(),
        }
    }

    fn declared() -> ResourceData {
        ResourceData::from_state(DynamicValue::from_json(json!({
            "id": "acme/logs",
            "namespace": "acme",
            "name": "logs",
            "compartment_id": "ocid1.compartment.oc1..c",
        })))
    }

    #[test]
    fn projecting_twice_is_idempotent() {
        let remote = bucket();
        let mut once = declared();
        project(&BucketResource, &mut once, Some(&remote)).unwrap();
        let mut twice = once.clone();
        project(&BucketResource, &mut twice, Some(&remote)).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.get_string("created_by"), "ocid1.user.oc1..u");
    }

    #[test]
    fn projecting_nothing_leaves_state_alone() {
        let mut d = declared();
        project(&BucketResource, &mut d, None).unwrap();
        assert_eq!(d, declared());
    }

    #[tokio::test]
    async fn create_checks_required_attributes_first() {
        let client = FakeClient::new();
        let mut d = ResourceData::from_state(DynamicValue::from_json(json!({"name": "logs"})));

        let err = create_resource(
            &BucketResource,
            &Context::new(),
            &client,
            &PollPolicy::immediate(),
            &mut d,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            CrudError::MissingAttribute(ref names) if names.contains("namespace")
        ));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn create_sets_the_remote_identifier() {
        let client = FakeClient::new();
        let mut d = declared();
        d.set_id("");

        create_resource(
            &BucketResource,
            &Context::new(),
            &client,
            &PollPolicy::immediate(),
            &mut d,
        )
        .await
        .unwrap();

        assert_eq!(d.id(), "acme/logs");
        assert_eq!(client.calls(), ["create_bucket"]);
    }

    #[tokio::test]
    async fn read_of_missing_object_clears_the_id() {
        let client = FakeClient::new();
        let mut d = declared();

        read_resource(&BucketResource, &client, &mut d)
            .await
            .unwrap();

        assert_eq!(d.id(), "");
    }

    #[tokio::test]
    async fn read_refreshes_existing_object() {
        let client = FakeClient::new();
        client.insert_bucket(bucket());
        let mut d = declared();

        read_resource(&BucketResource, &client, &mut d)
            .await
            .unwrap();

        assert_eq!(d.id(), "acme/logs");
        assert_eq!(
            d.get_string_map("metadata").get("team").map(String::as_str),
            Some("infra")
        );
    }

    #[tokio::test]
    async fn delete_of_missing_object_succeeds() {
        let client = FakeClient::new();
        let mut d = declared();

        delete_resource(
            &BucketResource,
            &Context::new(),
            &client,
            &PollPolicy::immediate(),
            &mut d,
        )
        .await
        .unwrap();

        assert_eq!(d.id(), "");
        assert_eq!(client.calls(), ["delete_bucket"]);
    }

    #[test]
    fn narrowing_integers() {
        let mut d = ResourceData::new();
        d.set("port", 8080i64).unwrap();
        assert_eq!(get_int_as::<u16>(&d, "port").unwrap(), 8080);

        d.set("port", 70000i64).unwrap();
        assert!(matches!(
            get_int_as::<u16>(&d, "port"),
            Err(CrudError::State(TfplugError::TypeMismatch { .. }))
        ));
    }
}

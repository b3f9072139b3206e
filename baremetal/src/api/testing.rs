//! In-memory stand-in for the cloud
//!
//! `FakeClient` implements `BareMetalClient` against a small in-process
//! model of the services the provider touches. Tests script work request
//! progressions and lifecycle transitions, inject call failures, seed list
//! collections, and inspect the calls that were made.

use crate::api::client::{ApiResult, BareMetalClient};
use crate::api::common::{LifecycleState, ListOptions, Page};
use crate::api::error::ApiError;
use crate::api::models::*;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_NAMESPACE: &str = "fakenamespace";

pub struct FakeClient {
    cloud: Mutex<FakeCloud>,
}

struct ScriptedWorkRequest {
    load_balancer_id: String,
    kind: String,
    states: VecDeque<WorkRequestState>,
    time_accepted: chrono::DateTime<Utc>,
}

struct FakeCloud {
    calls: Vec<String>,
    list_requests: Vec<ListOptions>,
    failures: HashMap<String, VecDeque<ApiError>>,
    next_work_request: Vec<WorkRequestState>,
    work_requests: HashMap<String, ScriptedWorkRequest>,
    lifecycles: HashMap<String, VecDeque<LifecycleState>>,
    backends: HashMap<(String, String, String), Backend>,
    backend_sets: HashMap<(String, String), BackendSet>,
    buckets: HashMap<(String, String), Bucket>,
    objects: HashMap<(String, String, String), Object>,
    console_histories: HashMap<String, ConsoleHistory>,
    db_systems: HashMap<String, DbSystem>,
    collections: HashMap<String, Vec<Value>>,
    page_size: Option<usize>,
    namespace: String,
    next_id: u64,
    next_work_request_id: u64,
}

impl FakeCloud {
    fn enter(&mut self, method: &str) -> ApiResult<()> {
        self.calls.push(method.to_string());
        match self.failures.get_mut(method).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn new_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("ocid1.{}.fake.{}", kind, self.next_id)
    }

    /// Registers a work request following the current script. Returns the
    /// id and whether the request will end in success.
    fn submit(&mut self, load_balancer_id: &str, kind: &str) -> (String, bool) {
        self.next_work_request_id += 1;
        let id = format!("wr-{}", self.next_work_request_id);
        let states: VecDeque<_> = self.next_work_request.iter().copied().collect();
        let succeeds = states.back() != Some(&WorkRequestState::Failed);

        self.work_requests.insert(
            id.clone(),
            ScriptedWorkRequest {
                load_balancer_id: load_balancer_id.to_string(),
                kind: kind.to_string(),
                states,
                time_accepted: Utc::now(),
            },
        );
        (id, succeeds)
    }

    /// The next lifecycle state for `id`: scripted states are consumed one
    /// per read (the last one sticks), otherwise transitional states settle
    fn advance(&mut self, id: &str, current: LifecycleState) -> LifecycleState {
        if let Some(script) = self.lifecycles.get_mut(id) {
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            };
            if let Some(state) = next {
                return state;
            }
        }

        match current {
            LifecycleState::Provisioning | LifecycleState::Updating => LifecycleState::Available,
            LifecycleState::Requested | LifecycleState::GettingHistory => LifecycleState::Succeeded,
            LifecycleState::Terminating => LifecycleState::Terminated,
            LifecycleState::Creating => LifecycleState::Active,
            LifecycleState::Deleting => LifecycleState::Deleted,
            other => other,
        }
    }

    fn list<T: DeserializeOwned>(
        &mut self,
        collection: &str,
        filters: &[(&str, Option<&str>)],
        options: ListOptions,
    ) -> ApiResult<Page<T>> {
        self.list_requests.push(options.clone());

        let matching: Vec<&Value> = self
            .collections
            .get(collection)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        filters.iter().all(|(field, wanted)| match wanted {
                            Some(wanted) => {
                                item.get(*field).and_then(Value::as_str) == Some(*wanted)
                            }
                            None => true,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let start = match options.page.as_deref() {
            None | Some("") => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                ApiError::service(
                    400,
                    "InvalidParameter",
                    format!("invalid page token {token}"),
                )
            })?,
        };
        let size = options
            .limit
            .map(|l| l as usize)
            .or(self.page_size)
            .unwrap_or(usize::MAX)
            .max(1);
        let end = start.saturating_add(size).min(matching.len());

        let items = matching
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|v| serde_json::from_value((*v).clone()))
            .collect::<Result<Vec<T>, _>>()?;

        let next_page = (end < matching.len()).then(|| end.to_string());
        Ok(Page { items, next_page })
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            cloud: Mutex::new(FakeCloud {
                calls: Vec::new(),
                list_requests: Vec::new(),
                failures: HashMap::new(),
                next_work_request: vec![WorkRequestState::Accepted, WorkRequestState::Succeeded],
                work_requests: HashMap::new(),
                lifecycles: HashMap::new(),
                backends: HashMap::new(),
                backend_sets: HashMap::new(),
                buckets: HashMap::new(),
                objects: HashMap::new(),
                console_histories: HashMap::new(),
                db_systems: HashMap::new(),
                collections: HashMap::new(),
                page_size: None,
                namespace: DEFAULT_NAMESPACE.to_string(),
                next_id: 0,
                next_work_request_id: 0,
            }),
        }
    }

    fn cloud(&self) -> MutexGuard<'_, FakeCloud> {
        self.cloud.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every client method invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.cloud().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.cloud().calls.iter().filter(|c| *c == method).count()
    }

    /// The paging options received by list calls, in order
    pub fn list_requests(&self) -> Vec<ListOptions> {
        self.cloud().list_requests.clone()
    }

    /// The next call to `method` fails with `error`
    pub fn fail_next(&self, method: &str, error: ApiError) {
        self.cloud()
            .failures
            .entry(method.to_string())
            .or_default()
            .push_back(error);
    }

    /// States reported by work requests created from now on. Each poll
    /// consumes one state; the last one is repeated.
    pub fn script_next_work_requests(&self, states: &[WorkRequestState]) {
        self.cloud().next_work_request = states.to_vec();
    }

    /// Registers a work request that is not tied to any mutation
    pub fn script_work_request(&self, id: &str, states: &[WorkRequestState]) {
        self.cloud().work_requests.insert(
            id.to_string(),
            ScriptedWorkRequest {
                load_balancer_id: "ocid1.loadbalancer.fake".to_string(),
                kind: "Scripted".to_string(),
                states: states.iter().copied().collect(),
                time_accepted: Utc::now(),
            },
        );
    }

    /// Lifecycle states reported by successive reads of `id`
    pub fn script_lifecycle(&self, id: &str, states: &[LifecycleState]) {
        self.cloud()
            .lifecycles
            .insert(id.to_string(), states.iter().copied().collect());
    }

    /// Page size used by list calls that do not pass a limit
    pub fn set_page_size(&self, size: usize) {
        self.cloud().page_size = Some(size);
    }

    pub fn set_namespace(&self, namespace: &str) {
        self.cloud().namespace = namespace.to_string();
    }

    /// Seeds a list-only collection such as `groups` or `vnic_attachments`
    pub fn seed<T: Serialize>(&self, collection: &str, items: impl IntoIterator<Item = T>) {
        let values: Vec<Value> = items
            .into_iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect();
        self.cloud()
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(values);
    }

    pub fn insert_backend_set(&self, load_balancer_id: &str, backend_set: BackendSet) {
        let mut cloud = self.cloud();
        for backend in &backend_set.backends {
            cloud.backends.insert(
                (
                    load_balancer_id.to_string(),
                    backend_set.name.clone(),
                    backend.name.clone(),
                ),
                backend.clone(),
            );
        }
        cloud.backend_sets.insert(
            (load_balancer_id.to_string(), backend_set.name.clone()),
            backend_set,
        );
    }

    pub fn insert_bucket(&self, bucket: Bucket) {
        self.cloud()
            .buckets
            .insert((bucket.namespace.clone(), bucket.name.clone()), bucket);
    }

    pub fn insert_object(&self, object: Object) {
        self.cloud().objects.insert(
            (
                object.namespace.clone(),
                object.bucket.clone(),
                object.name.clone(),
            ),
            object,
        );
    }

    pub fn insert_db_system(&self, db_system: DbSystem) {
        self.cloud()
            .db_systems
            .insert(db_system.id.clone(), db_system);
    }

    pub fn backend(&self, load_balancer_id: &str, set: &str, name: &str) -> Option<Backend> {
        self.cloud()
            .backends
            .get(&(
                load_balancer_id.to_string(),
                set.to_string(),
                name.to_string(),
            ))
            .cloned()
    }

    pub fn bucket(&self, namespace: &str, name: &str) -> Option<Bucket> {
        self.cloud()
            .buckets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn object(&self, namespace: &str, bucket: &str, name: &str) -> Option<Object> {
        self.cloud()
            .objects
            .get(&(namespace.to_string(), bucket.to_string(), name.to_string()))
            .cloned()
    }

    pub fn db_system(&self, id: &str) -> Option<DbSystem> {
        self.cloud().db_systems.get(id).cloned()
    }
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new()
    }
}

fn backend_set_with_backends(
    cloud: &FakeCloud,
    load_balancer_id: &str,
    name: &str,
) -> Option<BackendSet> {
    let mut set = cloud
        .backend_sets
        .get(&(load_balancer_id.to_string(), name.to_string()))?
        .clone();
    let mut backends: Vec<Backend> = cloud
        .backends
        .iter()
        .filter(|((lb, s, _), _)| lb == load_balancer_id && s == name)
        .map(|(_, b)| b.clone())
        .collect();
    backends.sort_by(|a, b| a.name.cmp(&b.name));
    set.backends = backends;
    Some(set)
}

#[async_trait]
impl BareMetalClient for FakeClient {
    async fn get_work_request(&self, work_request_id: &str) -> ApiResult<WorkRequest> {
        let mut cloud = self.cloud();
        cloud.enter("get_work_request")?;

        let scripted = cloud
            .work_requests
            .get_mut(work_request_id)
            .ok_or_else(|| ApiError::not_found(format!("Work request {work_request_id}")))?;
        let state = if scripted.states.len() > 1 {
            scripted.states.pop_front()
        } else {
            scripted.states.front().copied()
        }
        .unwrap_or(WorkRequestState::Succeeded);

        let error_details = if state == WorkRequestState::Failed {
            vec![WorkRequestError {
                error_code: "BAD_INPUT".to_string(),
                message: format!("{} failed", scripted.kind),
            }]
        } else {
            Vec::new()
        };
        let finished = matches!(state, WorkRequestState::Succeeded | WorkRequestState::Failed);

        Ok(WorkRequest {
            id: work_request_id.to_string(),
            load_balancer_id: scripted.load_balancer_id.clone(),
            work_request_type: scripted.kind.clone(),
            state,
            message: state.to_string(),
            error_details,
            time_accepted: scripted.time_accepted,
            time_finished: finished.then(Utc::now),
        })
    }

    async fn create_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: CreateBackendDetails,
    ) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("create_backend")?;

        let (id, succeeds) = cloud.submit(load_balancer_id, "CreateBackend");
        if succeeds {
            let name = format!("{}:{}", details.ip_address, details.port);
            cloud.backends.insert(
                (
                    load_balancer_id.to_string(),
                    backend_set_name.to_string(),
                    name.clone(),
                ),
                Backend {
                    name,
                    ip_address: details.ip_address,
                    port: details.port,
                    weight: details.weight,
                    backup: details.backup,
                    drain: details.drain,
                    offline: details.offline,
                },
            );
        }
        Ok(id)
    }

    async fn get_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
    ) -> ApiResult<Backend> {
        let mut cloud = self.cloud();
        cloud.enter("get_backend")?;
        cloud
            .backends
            .get(&(
                load_balancer_id.to_string(),
                backend_set_name.to_string(),
                backend_name.to_string(),
            ))
            .cloned()
            .ok_or_else(|| {
                ApiError::service(
                    404,
                    "NotFound",
                    format!("Backend {backend_name} not present in backend set {backend_set_name}"),
                )
            })
    }

    async fn update_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        details: UpdateBackendDetails,
    ) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("update_backend")?;

        let key = (
            load_balancer_id.to_string(),
            backend_set_name.to_string(),
            backend_name.to_string(),
        );
        if !cloud.backends.contains_key(&key) {
            return Err(ApiError::not_found(format!("Backend {backend_name}")));
        }
        let (id, succeeds) = cloud.submit(load_balancer_id, "UpdateBackend");
        if succeeds {
            if let Some(backend) = cloud.backends.get_mut(&key) {
                backend.weight = details.weight;
                backend.backup = details.backup;
                backend.drain = details.drain;
                backend.offline = details.offline;
            }
        }
        Ok(id)
    }

    async fn delete_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
    ) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("delete_backend")?;

        let key = (
            load_balancer_id.to_string(),
            backend_set_name.to_string(),
            backend_name.to_string(),
        );
        if !cloud.backends.contains_key(&key) {
            return Err(ApiError::not_found(format!("Backend {backend_name}")));
        }
        let (id, succeeds) = cloud.submit(load_balancer_id, "DeleteBackend");
        if succeeds {
            cloud.backends.remove(&key);
        }
        Ok(id)
    }

    async fn create_backend_set(
        &self,
        load_balancer_id: &str,
        details: CreateBackendSetDetails,
    ) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("create_backend_set")?;

        let (id, succeeds) = cloud.submit(load_balancer_id, "CreateBackendSet");
        if succeeds {
            cloud.backend_sets.insert(
                (load_balancer_id.to_string(), details.name.clone()),
                BackendSet {
                    name: details.name,
                    policy: details.policy,
                    backends: Vec::new(),
                    health_checker: details.health_checker,
                    ssl_configuration: details.ssl_configuration,
                },
            );
        }
        Ok(id)
    }

    async fn get_backend_set(&self, load_balancer_id: &str, name: &str) -> ApiResult<BackendSet> {
        let mut cloud = self.cloud();
        cloud.enter("get_backend_set")?;
        backend_set_with_backends(&cloud, load_balancer_id, name)
            .ok_or_else(|| {
                ApiError::service(404, "NotFound", format!("Backend set {name} not found"))
            })
    }

    async fn update_backend_set(
        &self,
        load_balancer_id: &str,
        name: &str,
        details: UpdateBackendSetDetails,
    ) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("update_backend_set")?;

        let key = (load_balancer_id.to_string(), name.to_string());
        if !cloud.backend_sets.contains_key(&key) {
            return Err(ApiError::not_found(format!("Backend set {name}")));
        }
        let (id, succeeds) = cloud.submit(load_balancer_id, "UpdateBackendSet");
        if succeeds {
            if let Some(set) = cloud.backend_sets.get_mut(&key) {
                set.policy = details.policy;
                set.health_checker = details.health_checker;
                set.ssl_configuration = details.ssl_configuration;
            }
            cloud
                .backends
                .retain(|(lb, s, _), _| !(lb == load_balancer_id && s == name));
            for b in details.backends {
                let backend_name = format!("{}:{}", b.ip_address, b.port);
                cloud.backends.insert(
                    (load_balancer_id.to_string(), name.to_string(), backend_name.clone()),
                    Backend {
                        name: backend_name,
                        ip_address: b.ip_address,
                        port: b.port,
                        weight: b.weight,
                        backup: b.backup,
                        drain: b.drain,
                        offline: b.offline,
                    },
                );
            }
        }
        Ok(id)
    }

    async fn delete_backend_set(&self, load_balancer_id: &str, name: &str) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("delete_backend_set")?;

        let key = (load_balancer_id.to_string(), name.to_string());
        if !cloud.backend_sets.contains_key(&key) {
            return Err(ApiError::not_found(format!("Backend set {name}")));
        }
        let (id, succeeds) = cloud.submit(load_balancer_id, "DeleteBackendSet");
        if succeeds {
            cloud.backend_sets.remove(&key);
            cloud
                .backends
                .retain(|(lb, s, _), _| !(lb == load_balancer_id && s == name));
        }
        Ok(id)
    }

    async fn list_load_balancer_shapes(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<LoadBalancerShape>> {
        let mut cloud = self.cloud();
        cloud.enter("list_load_balancer_shapes")?;
        let _ = compartment_id;
        cloud.list("load_balancer_shapes", &[], options)
    }

    async fn get_namespace(&self) -> ApiResult<String> {
        let mut cloud = self.cloud();
        cloud.enter("get_namespace")?;
        Ok(cloud.namespace.clone())
    }

    async fn create_bucket(
        &self,
        namespace: &str,
        details: CreateBucketDetails,
    ) -> ApiResult<Bucket> {
        let mut cloud = self.cloud();
        cloud.enter("create_bucket")?;

        let key = (namespace.to_string(), details.name.clone());
        if cloud.buckets.contains_key(&key) {
            return Err(ApiError::service(
                409,
                "BucketAlreadyExists",
                format!("Bucket {} already exists", details.name),
            ));
        }
        let bucket = Bucket {
            namespace: namespace.to_string(),
            name: details.name,
            compartment_id: details.compartment_id,
            metadata: details.metadata,
            created_by: "ocid1.user.fake".to_string(),
            time_created: Utc::now(),
        };
        cloud.buckets.insert(key, bucket.clone());
        Ok(bucket)
    }

    async fn get_bucket(&self, namespace: &str, name: &str) -> ApiResult<Bucket> {
        let mut cloud = self.cloud();
        cloud.enter("get_bucket")?;
        cloud
            .buckets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                ApiError::service(
                    404,
                    "BucketNotFound",
                    format!("Bucket {name} does not exist"),
                )
            })
    }

    async fn update_bucket(
        &self,
        namespace: &str,
        name: &str,
        details: UpdateBucketDetails,
    ) -> ApiResult<Bucket> {
        let mut cloud = self.cloud();
        cloud.enter("update_bucket")?;

        let mut bucket = cloud
            .buckets
            .remove(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| ApiError::not_found(format!("Bucket {name}")))?;
        bucket.name = details.name;
        bucket.metadata = details.metadata;
        cloud
            .buckets
            .insert((namespace.to_string(), bucket.name.clone()), bucket.clone());
        Ok(bucket)
    }

    async fn delete_bucket(&self, namespace: &str, name: &str) -> ApiResult<()> {
        let mut cloud = self.cloud();
        cloud.enter("delete_bucket")?;
        cloud
            .buckets
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("Bucket {name}")))
    }

    async fn put_object(
        &self,
        namespace: &str,
        bucket: &str,
        name: &str,
        details: PutObjectDetails,
    ) -> ApiResult<Object> {
        let mut cloud = self.cloud();
        cloud.enter("put_object")?;

        let object = Object {
            namespace: namespace.to_string(),
            bucket: bucket.to_string(),
            name: name.to_string(),
            content: details.content,
            metadata: details.metadata,
        };
        cloud.objects.insert(
            (namespace.to_string(), bucket.to_string(), name.to_string()),
            object.clone(),
        );
        Ok(object)
    }

    async fn get_object(&self, namespace: &str, bucket: &str, name: &str) -> ApiResult<Object> {
        let mut cloud = self.cloud();
        cloud.enter("get_object")?;
        cloud
            .objects
            .get(&(namespace.to_string(), bucket.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                ApiError::service(404, "ObjectNotFound", format!("Object {name} not found"))
            })
    }

    async fn head_object(
        &self,
        namespace: &str,
        bucket: &str,
        name: &str,
    ) -> ApiResult<HeadObject> {
        let mut cloud = self.cloud();
        cloud.enter("head_object")?;
        cloud
            .objects
            .get(&(namespace.to_string(), bucket.to_string(), name.to_string()))
            .map(|o| HeadObject {
                namespace: o.namespace.clone(),
                bucket: o.bucket.clone(),
                name: o.name.clone(),
                content_length: o.content.len() as u64,
                content_type: "application/octet-stream".to_string(),
                metadata: o.metadata.clone(),
            })
            .ok_or_else(|| {
                ApiError::service(404, "ObjectNotFound", format!("Object {name} not found"))
            })
    }

    async fn delete_object(&self, namespace: &str, bucket: &str, name: &str) -> ApiResult<()> {
        let mut cloud = self.cloud();
        cloud.enter("delete_object")?;
        cloud
            .objects
            .remove(&(namespace.to_string(), bucket.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("Object {name}")))
    }

    async fn capture_console_history(
        &self,
        details: CaptureConsoleHistoryDetails,
    ) -> ApiResult<ConsoleHistory> {
        let mut cloud = self.cloud();
        cloud.enter("capture_console_history")?;

        let id = cloud.new_id("consolehistory");
        let history = ConsoleHistory {
            id: id.clone(),
            availability_domain: "AD-1".to_string(),
            compartment_id: "ocid1.compartment.fake".to_string(),
            display_name: details.display_name,
            instance_id: details.instance_id,
            lifecycle_state: LifecycleState::Requested,
            time_created: Utc::now(),
        };
        cloud.console_histories.insert(id, history.clone());
        Ok(history)
    }

    async fn get_console_history(&self, id: &str) -> ApiResult<ConsoleHistory> {
        let mut cloud = self.cloud();
        cloud.enter("get_console_history")?;

        let current = cloud
            .console_histories
            .get(id)
            .map(|h| h.lifecycle_state)
            .ok_or_else(|| ApiError::not_found(format!("Console history {id}")))?;
        let next = cloud.advance(id, current);
        let history = cloud
            .console_histories
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found(format!("Console history {id}")))?;
        history.lifecycle_state = next;
        Ok(history.clone())
    }

    async fn delete_console_history(&self, id: &str) -> ApiResult<()> {
        let mut cloud = self.cloud();
        cloud.enter("delete_console_history")?;
        cloud
            .console_histories
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("Console history {id}")))
    }

    async fn list_dhcp_options(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DhcpOptions>> {
        let mut cloud = self.cloud();
        cloud.enter("list_dhcp_options")?;
        cloud.list(
            "dhcp_options",
            &[("compartmentId", Some(compartment_id)), ("vcnId", Some(vcn_id))],
            options,
        )
    }

    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<InternetGateway>> {
        let mut cloud = self.cloud();
        cloud.enter("list_internet_gateways")?;
        cloud.list(
            "internet_gateways",
            &[("compartmentId", Some(compartment_id)), ("vcnId", Some(vcn_id))],
            options,
        )
    }

    async fn get_ipsec_connection_device_status(
        &self,
        ipsec_id: &str,
    ) -> ApiResult<IpSecConnectionDeviceStatus> {
        let mut cloud = self.cloud();
        cloud.enter("get_ipsec_connection_device_status")?;
        let page: Page<IpSecConnectionDeviceStatus> = cloud.list(
            "ipsec_status",
            &[("id", Some(ipsec_id))],
            ListOptions::default(),
        )?;
        // Not a list call; drop the paging record it left behind
        cloud.list_requests.pop();
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(format!("IPSec connection {ipsec_id}")))
    }

    async fn list_shapes(
        &self,
        compartment_id: &str,
        filter: ShapeFilter,
        options: ListOptions,
    ) -> ApiResult<Page<Shape>> {
        let mut cloud = self.cloud();
        cloud.enter("list_shapes")?;
        let _ = (compartment_id, filter);
        cloud.list("shapes", &[], options)
    }

    async fn list_vnic_attachments(
        &self,
        compartment_id: &str,
        filter: VnicAttachmentFilter,
        options: ListOptions,
    ) -> ApiResult<Page<VnicAttachment>> {
        let mut cloud = self.cloud();
        cloud.enter("list_vnic_attachments")?;
        cloud.list(
            "vnic_attachments",
            &[
                ("compartmentId", Some(compartment_id)),
                ("availabilityDomain", filter.availability_domain.as_deref()),
                ("instanceId", filter.instance_id.as_deref()),
                ("vnicId", filter.vnic_id.as_deref()),
            ],
            options,
        )
    }

    async fn list_volume_backups(
        &self,
        compartment_id: &str,
        volume_id: Option<String>,
        options: ListOptions,
    ) -> ApiResult<Page<VolumeBackup>> {
        let mut cloud = self.cloud();
        cloud.enter("list_volume_backups")?;
        cloud.list(
            "volume_backups",
            &[
                ("compartmentId", Some(compartment_id)),
                ("volumeId", volume_id.as_deref()),
            ],
            options,
        )
    }

    async fn launch_db_system(&self, details: LaunchDbSystemDetails) -> ApiResult<DbSystem> {
        let mut cloud = self.cloud();
        cloud.enter("launch_db_system")?;

        let id = cloud.new_id("dbsystem");
        let db_system = DbSystem {
            id: id.clone(),
            availability_domain: details.availability_domain,
            compartment_id: details.compartment_id,
            shape: details.shape,
            subnet_id: details.subnet_id,
            ssh_public_keys: details.ssh_public_keys,
            cpu_core_count: details.cpu_core_count,
            display_name: details.display_name,
            database_edition: details.database_edition,
            db_home: details.db_home,
            disk_redundancy: details.disk_redundancy,
            domain: details.domain,
            hostname: details.hostname,
            lifecycle_details: String::new(),
            listener_port: 1521,
            lifecycle_state: LifecycleState::Provisioning,
            time_created: Utc::now(),
        };

        // Reads never echo the db home back
        let mut stored = db_system.clone();
        stored.db_home = None;
        cloud.db_systems.insert(id, stored);
        Ok(db_system)
    }

    async fn get_db_system(&self, id: &str) -> ApiResult<DbSystem> {
        let mut cloud = self.cloud();
        cloud.enter("get_db_system")?;

        let current = cloud
            .db_systems
            .get(id)
            .map(|s| s.lifecycle_state)
            .ok_or_else(|| ApiError::not_found(format!("DB system {id}")))?;
        let next = cloud.advance(id, current);
        let db_system = cloud
            .db_systems
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found(format!("DB system {id}")))?;
        db_system.lifecycle_state = next;
        Ok(db_system.clone())
    }

    async fn terminate_db_system(&self, id: &str) -> ApiResult<()> {
        let mut cloud = self.cloud();
        cloud.enter("terminate_db_system")?;
        let db_system = cloud
            .db_systems
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found(format!("DB system {id}")))?;
        db_system.lifecycle_state = LifecycleState::Terminating;
        Ok(())
    }

    async fn list_db_systems(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DbSystem>> {
        let mut cloud = self.cloud();
        cloud.enter("list_db_systems")?;
        cloud.list(
            "db_systems",
            &[("compartmentId", Some(compartment_id))],
            options,
        )
    }

    async fn get_database(&self, id: &str) -> ApiResult<Database> {
        let mut cloud = self.cloud();
        cloud.enter("get_database")?;
        let page: Page<Database> =
            cloud.list("databases", &[("id", Some(id))], ListOptions::default())?;
        cloud.list_requests.pop();
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(format!("Database {id}")))
    }

    async fn get_db_home(&self, id: &str) -> ApiResult<DbHome> {
        let mut cloud = self.cloud();
        cloud.enter("get_db_home")?;
        let page: Page<DbHome> =
            cloud.list("db_homes", &[("id", Some(id))], ListOptions::default())?;
        cloud.list_requests.pop();
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(format!("DB home {id}")))
    }

    async fn list_db_versions(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<DbVersion>> {
        let mut cloud = self.cloud();
        cloud.enter("list_db_versions")?;
        let _ = compartment_id;
        cloud.list("db_versions", &[], options)
    }

    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> ApiResult<Vec<AvailabilityDomain>> {
        let mut cloud = self.cloud();
        cloud.enter("list_availability_domains")?;
        let page: Page<AvailabilityDomain> = cloud.list(
            "availability_domains",
            &[("compartmentId", Some(compartment_id))],
            ListOptions::default(),
        )?;
        cloud.list_requests.pop();
        Ok(page.items)
    }

    async fn list_groups(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<Group>> {
        let mut cloud = self.cloud();
        cloud.enter("list_groups")?;
        cloud.list(
            "groups",
            &[("compartmentId", Some(compartment_id))],
            options,
        )
    }

    async fn list_policies(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<Policy>> {
        let mut cloud = self.cloud();
        cloud.enter("list_policies")?;
        cloud.list(
            "policies",
            &[("compartmentId", Some(compartment_id))],
            options,
        )
    }

    async fn list_users(
        &self,
        compartment_id: &str,
        options: ListOptions,
    ) -> ApiResult<Page<User>> {
        let mut cloud = self.cloud();
        cloud.enter("list_users")?;
        cloud.list("users", &[("compartmentId", Some(compartment_id))], options)
    }
}

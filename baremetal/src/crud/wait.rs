//! Polling for asynchronous state changes
//!
//! Load balancer mutations are tracked by work requests; database systems
//! and console histories expose their own lifecycle state. Both are waited
//! on through `wait_for_state`, which re-fetches the object with an
//! exponential backoff until its state reaches a target, leaves the
//! pending set, or the deadline passes.

use crate::api::models::{WorkRequest, WorkRequestState};
use crate::api::{BareMetalClient, LifecycleState};
use crate::crud::error::{CrudError, CrudResult};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tfplug::{Context, PollPolicy};
use tokio::time::{sleep, Instant};
use tracing::debug;

/// A state enum the poller can classify
pub trait PollState: Copy + PartialEq + Display + Send + Sync + 'static {}

impl PollState for WorkRequestState {}
impl PollState for LifecycleState {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Pending,
    Target,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateSets<S> {
    pub pending: Vec<S>,
    pub target: Vec<S>,
}

impl<S: PollState> StateSets<S> {
    pub fn new(pending: impl IntoIterator<Item = S>, target: impl IntoIterator<Item = S>) -> Self {
        Self {
            pending: pending.into_iter().collect(),
            target: target.into_iter().collect(),
        }
    }

    pub fn classify(&self, state: S) -> Classification {
        if self.target.contains(&state) {
            Classification::Target
        } else if self.pending.contains(&state) {
            Classification::Pending
        } else {
            Classification::Unexpected
        }
    }

    /// Target states for error messages
    pub fn expected(&self) -> String {
        self.target
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl StateSets<WorkRequestState> {
    pub fn work_request() -> Self {
        Self::new(
            [WorkRequestState::Accepted, WorkRequestState::InProgress],
            [WorkRequestState::Succeeded],
        )
    }
}

impl StateSets<LifecycleState> {
    pub fn created() -> Self {
        Self::new([LifecycleState::Provisioning], [LifecycleState::Available])
    }

    pub fn updated() -> Self {
        Self::new(
            [LifecycleState::Updating, LifecycleState::Provisioning],
            [LifecycleState::Available],
        )
    }

    pub fn deleted() -> Self {
        Self::new([LifecycleState::Terminating], [LifecycleState::Terminated])
    }
}

/// Re-run `refresh` until the state it reports is in `sets.target`.
///
/// A state outside pending and target fails immediately with
/// `UnexpectedState`. The effective deadline is the earlier of `timeout`
/// and the context deadline. An explicit context cancel returns
/// `Cancelled` without another fetch.
pub async fn wait_for_state<S, T, F, Fut>(
    ctx: &Context,
    sets: &StateSets<S>,
    policy: &PollPolicy,
    timeout: Duration,
    mut refresh: F,
) -> CrudResult<T>
where
    S: PollState,
    F: FnMut() -> Fut,
    Fut: Future<Output = CrudResult<(T, S)>>,
{
    let started = Instant::now();
    let deadline = match (started.checked_add(timeout), ctx.deadline()) {
        (Some(own), Some(parent)) => Some(own.min(parent)),
        (own, parent) => own.or(parent),
    };
    let effective_timeout = deadline
        .map(|d| d.saturating_duration_since(started))
        .unwrap_or(timeout);

    if !policy.delay.is_zero() {
        tokio::select! {
            _ = sleep(policy.delay) => {}
            _ = ctx.cancelled() => {}
        }
    }

    let mut interval = policy.min_interval;
    loop {
        if ctx.cancel_requested() {
            return Err(CrudError::Cancelled);
        }

        let (value, state) = refresh().await?;
        match sets.classify(state) {
            Classification::Target => {
                debug!(state = %state, "Reached target state");
                return Ok(value);
            }
            Classification::Unexpected => {
                return Err(CrudError::UnexpectedState {
                    state: state.to_string(),
                    expected: sets.expected(),
                });
            }
            Classification::Pending => {}
        }

        let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        if remaining == Some(Duration::ZERO) {
            return Err(CrudError::Timeout {
                state: state.to_string(),
                expected: sets.expected(),
                timeout: effective_timeout,
            });
        }

        let pause = remaining.map_or(interval, |r| r.min(interval));
        debug!(state = %state, wait = ?pause, "Waiting for state to change");
        tokio::select! {
            _ = sleep(pause) => {}
            _ = ctx.cancelled() => {}
        }
        interval = policy.next_interval(interval);
    }
}

/// Wait for a work request to succeed. FAILED carries the request's error
/// details and stops polling immediately.
pub async fn wait_for_work_request(
    ctx: &Context,
    client: &dyn BareMetalClient,
    work_request_id: &str,
    policy: &PollPolicy,
    timeout: Duration,
) -> CrudResult<WorkRequest> {
    debug!(work_request_id, "Waiting for work request");
    wait_for_state(
        ctx,
        &StateSets::work_request(),
        policy,
        timeout,
        move || async move {
            let wr = client.get_work_request(work_request_id).await?;
            if wr.state == WorkRequestState::Failed {
                return Err(CrudError::WorkRequestFailed {
                    id: wr.id.clone(),
                    message: wr.failure_message(),
                });
            }
            let state = wr.state;
            Ok((wr, state))
        },
    )
    .await
}

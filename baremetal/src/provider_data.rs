//! Provider data structure passed to resources and data sources

use crate::api::BareMetalClient;
use std::sync::Arc;
use tfplug::PollPolicy;

#[derive(Clone)]
pub struct BareMetalProviderData {
    pub client: Arc<dyn BareMetalClient>,
    pub poll_policy: PollPolicy,
}

impl BareMetalProviderData {
    pub fn new(client: Arc<dyn BareMetalClient>) -> Self {
        Self {
            client,
            poll_policy: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }
}

impl std::fmt::Debug for BareMetalProviderData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BareMetalProviderData")
            .field("poll_policy", &self.poll_policy)
            .finish_non_exhaustive()
    }
}

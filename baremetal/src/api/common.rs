//! Types shared by every service: page cursors and lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cursor and page size for list calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListOptions {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            page: None,
            limit: Some(limit),
        }
    }
}

/// One page of a list call; `next_page` is the cursor for the following page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Lifecycle states reported by objects that track their own provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Provisioning,
    Available,
    Updating,
    Terminating,
    Terminated,
    Requested,
    GettingHistory,
    Succeeded,
    Failed,
    Creating,
    Active,
    Inactive,
    Deleting,
    Deleted,
    Attaching,
    Attached,
    Detaching,
    Detached,
    #[serde(other)]
    Unknown,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Provisioning => "PROVISIONING",
            LifecycleState::Available => "AVAILABLE",
            LifecycleState::Updating => "UPDATING",
            LifecycleState::Terminating => "TERMINATING",
            LifecycleState::Terminated => "TERMINATED",
            LifecycleState::Requested => "REQUESTED",
            LifecycleState::GettingHistory => "GETTING_HISTORY",
            LifecycleState::Succeeded => "SUCCEEDED",
            LifecycleState::Failed => "FAILED",
            LifecycleState::Creating => "CREATING",
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Inactive => "INACTIVE",
            LifecycleState::Deleting => "DELETING",
            LifecycleState::Deleted => "DELETED",
            LifecycleState::Attaching => "ATTACHING",
            LifecycleState::Attached => "ATTACHED",
            LifecycleState::Detaching => "DETACHING",
            LifecycleState::Detached => "DETACHED",
            LifecycleState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_state_wire_names() {
        let state: LifecycleState = serde_json::from_str("\"GETTING_HISTORY\"").unwrap();
        assert_eq!(state, LifecycleState::GettingHistory);
        assert_eq!(state.to_string(), "GETTING_HISTORY");

        let unknown: LifecycleState = serde_json::from_str("\"MIGRATING\"").unwrap();
        assert_eq!(unknown, LifecycleState::Unknown);
    }

    #[test]
    fn page_cursor() {
        let page = Page {
            items: vec![1, 2],
            next_page: Some(String::new()),
        };
        assert!(!page.has_next());

        let page = Page {
            items: vec![1],
            next_page: Some("2".to_string()),
        };
        assert!(page.has_next());
        assert!(!Page::last(vec![3]).has_next());
    }
}

//! Operation timeouts and the refresh backoff used when waiting on remote state

use std::time::Duration;

/// Terraform's default timeout for every resource operation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    Create,
    Read,
    Update,
    Delete,
}

impl std::fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeoutKind::Create => "create",
            TimeoutKind::Read => "read",
            TimeoutKind::Update => "update",
            TimeoutKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Per-operation timeouts of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl ResourceTimeouts {
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            create: timeout,
            read: timeout,
            update: timeout,
            delete: timeout,
        }
    }

    pub fn get(&self, kind: TimeoutKind) -> Duration {
        match kind {
            TimeoutKind::Create => self.create,
            TimeoutKind::Read => self.read,
            TimeoutKind::Update => self.update,
            TimeoutKind::Delete => self.delete,
        }
    }
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_TIMEOUT)
    }
}

/// Refresh backoff for state polling.
///
/// The first check happens after `delay`; between checks the wait starts at
/// `min_interval` and doubles up to `max_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub delay: Duration,
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl PollPolicy {
    /// No waiting between checks, for tests and scripted clients
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            min_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
        }
    }

    pub fn next_interval(&self, current: Duration) -> Duration {
        if current < self.min_interval {
            return self.min_interval;
        }
        (current * 2).clamp(self.min_interval, self.max_interval.max(self.min_interval))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            min_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(10),
        }
    }
}

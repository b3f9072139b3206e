//! Oracle Bare Metal Cloud SDK surface used by the provider

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ApiResult, BareMetalClient};
pub use common::{LifecycleState, ListOptions, Page};
pub use error::ApiError;

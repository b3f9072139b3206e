//! tfplug - Terraform Plugin Framework for Rust
//!
//! The provider-facing half of the Terraform plugin contract: dynamic values,
//! schemas and validators, the declared-state accessor, the `Provider` /
//! `Resource` / `DataSource` traits, request contexts, timeouts, and an
//! in-process host that dispatches operations by type name.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod state;
pub mod timeouts;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod logging;
pub mod validator;

// Hosting
pub mod host;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use host::{PlannedChange, ProviderHost};
pub use import::import_state_passthrough_id;
pub use logging::{init_logging, LogLevel};
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure};
pub use schema::{AttributeBuilder, AttributeType, NestedBlockBuilder, Schema, SchemaBuilder};
pub use state::ResourceData;
pub use timeouts::{PollPolicy, ResourceTimeouts, TimeoutKind};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

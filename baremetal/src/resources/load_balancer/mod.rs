pub mod resource_backend;
pub mod resource_backend_set;

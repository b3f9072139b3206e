pub mod compute;
pub mod database;
pub mod load_balancer;
pub mod object_storage;

pub use compute::resource_console_history::ConsoleHistoryResource;
pub use database::resource_db_system::DbSystemResource;
pub use load_balancer::resource_backend::BackendResource;
pub use load_balancer::resource_backend_set::BackendSetResource;
pub use object_storage::resource_bucket::BucketResource;
pub use object_storage::resource_object::ObjectResource;

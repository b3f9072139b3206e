pub mod compute;
pub mod database;
pub mod identity;
pub mod load_balancer;
pub mod object_storage;
pub mod work_request;

pub use compute::*;
pub use database::*;
pub use identity::*;
pub use load_balancer::*;
pub use object_storage::*;
pub use work_request::*;

pub mod resource_bucket;
pub mod resource_object;

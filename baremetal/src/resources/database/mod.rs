pub mod resource_db_system;

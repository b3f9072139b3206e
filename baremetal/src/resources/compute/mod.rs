pub mod resource_console_history;

//! CLI command handling

pub mod args;
pub mod config_handlers;
pub mod handlers;
pub mod record_handlers;
pub mod sensor;

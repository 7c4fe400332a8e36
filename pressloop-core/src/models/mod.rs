//! Data models for pressloop

pub mod configuration;
pub mod record;
pub mod update;

pub use configuration::*;
pub use record::{timestamp_from_epoch, ButtonPress, MatchRecord, SENTINEL_UPDATE_ID};
pub use update::UpdateEvent;

//! Workflow units: notifier, poller and reporter

pub mod logging;
pub mod notifier;
pub mod poller;
pub mod reporter;

pub use notifier::Notifier;
pub use poller::{evaluate, select_candidate, PollOutcome, PollState, Poller};
pub use reporter::{table_fields, Reporter};

//! Orchestration layer
//!
//! Wires the collaborators around the pure resolution engine.
//!
//! # Modules
//!
//! - [`state`]: catalog, alias table and installed list, replaced wholesale
//! - [`refresh`]: one refresh cycle (fetch, parse, enumerate, resolve, filter, notify)
//! - [`scheduler`]: runs refresh cycles periodically and on request

pub mod refresh;
pub mod scheduler;
pub mod state;

pub use refresh::{ManifestOrigin, UpdateReport, Updater};
pub use scheduler::{Scheduler, SchedulerCommand, SchedulerHandle};
pub use state::UpdaterState;

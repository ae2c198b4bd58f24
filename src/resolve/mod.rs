//! Update resolution layer
//!
//! Cross-references installed software against the release catalog.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│   Bundle    │────▶│  Resolver   │
//! │ (manifest)  │     │(alias table)│     │(has update?)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │   Filter    │
//!                                         │(show/notify)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`bundle`]: alias table mapping component names to logical app names
//! - [`resolver`]: version ordering per app and update detection
//! - [`filter`]: display policy and notification selection
//! - [`types`]: `InstalledComponent` and `UpdateEntry`

pub mod bundle;
pub mod filter;
pub mod resolver;
pub mod types;

pub use bundle::AliasTable;
pub use filter::{Notification, filter_entries, notifications, should_notify};
pub use resolver::{build_installed, has_update, highest_version, resolve_all, sorted_versions};
pub use types::{InstalledComponent, UpdateEntry};

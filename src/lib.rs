//! Update-resolution engine for a desktop auto-update checker.
//!
//! The crate is layered leaf to root:
//!
//! - [`version`]: version identifiers and their canonical ordering
//! - [`manifest`]: decoding the published release catalog
//! - [`resolve`]: bundle aliasing, update detection and display filtering
//! - [`source`]: collaborators feeding the engine (software enumeration,
//!   manifest fetching, manifest cache) and consuming its output (notifications)
//! - [`app`]: refresh cycle orchestration and scheduling
//! - [`config`]: configuration file, constants and paths
//! - [`logging`]: tracing subscriber setup

pub mod app;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod resolve;
pub mod source;
pub mod version;

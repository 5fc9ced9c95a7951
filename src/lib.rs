//! kiln: command line client for the kiln image build service
//!
//! Resolves user-supplied identifiers (blueprint names, compose UUIDs,
//! module names) against a remote build-orchestration service and
//! renders the results as formatted text or one machine-readable JSON
//! document, tolerating per-item failures along the way.

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod save;
pub mod types;

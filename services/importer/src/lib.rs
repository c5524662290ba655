//! Stakeholder CSV import service.
//!
//! Wraps the [`csv_import`] pipeline in an HTTP API and a one-shot CLI
//! command. See [`server`] for the routes.

pub mod config;
pub mod error;
pub mod server;
pub mod tracker;

pub use config::{Args, Command};
pub use server::{build_router, start_server, ServerState};
pub use tracker::ImportTracker;

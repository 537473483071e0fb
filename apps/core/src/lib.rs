//! AgriPilot+ Data Hub core.
//!
//! Upload pipeline (classify, detect, simulate upload and analysis, route),
//! the farm data services behind the dashboard, and the ambient plumbing
//! (configuration, errors, logging) shared by the binary.

pub mod actors;
pub mod blob_store;
pub mod classify;
pub mod config;
pub mod data;
pub mod error;
pub mod hub;
pub mod integration;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod telemetry;

pub use error::AppError;
pub use hub::DataHub;

#[cfg(test)]
mod tests;

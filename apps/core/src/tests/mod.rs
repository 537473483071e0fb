//! Test Module
//!
//! Test suite for the AgriPilot+ Data Hub core.
//!
//! ## Test Categories
//! - `classify_tests`: file type classification and module detection
//! - `actor_tests`: upload, analysis and assistant actors, cancellation, failure injection
//! - `orchestrator_tests`: validation, batching, progress and notifications
//! - `data_tests`: seed repository, added records and page summaries
//! - `config_tests`: environment-driven configuration
//! - `integration_tests`: full upload → analysis → routing workflows, forms, assistant

pub mod actor_tests;
pub mod integration_tests;

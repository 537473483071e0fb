//! # Data Module
//!
//! Farm data served to the dashboard and module pages.
//!
//! ## Components
//! - `inputs`: validated records submitted from the add forms
//! - `models`: record types (crops, livestock, financing, documents, activity)
//! - `repository`: the `DataRepository` seam and its fixture backend
//! - `summaries`: page-level aggregates and filters

pub mod inputs;
pub mod models;
pub mod repository;
pub mod summaries;

pub use inputs::{NewCrop, NewFinancingOpportunity, NewLivestockGroup};
pub use repository::{DataRepository, FixtureRepository};

#![forbid(unsafe_code)]

//! Core domain model and business logic for the daily progress tracker.
//!
//! This crate provides:
//! - Domain types (daily records, personal profile)
//! - The record store (CSV persistence with upsert-by-date)
//! - Energy-balance metrics (BMR, maintenance, deficits, projections)
//! - Exports (CSV and a printable text report)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod metrics;
pub mod chart;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::RecordStore;
pub use metrics::{summarize, ProgressSummary};
pub use report::{export_csv, render_report, write_report};

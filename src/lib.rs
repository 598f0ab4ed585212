//! dmarc-advisor Library
//!
//! This library provides the core functionality for dmarc-advisor: error
//! handling, configuration, data models, report-file loading, XML record
//! extraction, batch aggregation, policy recommendation, chart-data
//! derivation, and webhook delivery.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod error;
pub mod file_handlers;
pub mod models;
pub mod pipeline;
pub mod policy;
pub mod webhook;
pub mod xml_parser;

pub use analysis::analyze;
pub use config::Config;
pub use error::{AdvisorError, Result};
pub use file_handlers::load_report;
pub use models::{AnalysisReport, NormalizedRecord};
pub use policy::{advise, Recommendation};
pub use xml_parser::parse_dmarc_report;

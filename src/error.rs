//! Error Handling Module
//!
//! This module defines the custom error types for dmarc-advisor using the
//! `thiserror` crate. Parse failures surface at file granularity, and the
//! no-data condition is a distinct terminal state rather than a numeric
//! default.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Record missing required field: {0}")]
    MissingField(String),

    #[error("Invalid message count: {0}")]
    InvalidCount(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data available for analysis")]
    NoData,
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

//! Data Models Module
//!
//! This module defines the core data structures used by dmarc-advisor: the
//! normalized per-record view of a DMARC aggregate report and the summary
//! statistics derived from a batch of records.

use crate::policy::Recommendation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row per `<record>` element of an aggregate report.
///
/// SPF/DKIM outcomes and the disposition are kept as the strings observed in
/// the report. Observed disposition values are `none`, `quarantine` and
/// `reject`; classification downstream compares against `"pass"` verbatim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub source_ip: String,
    pub spf_result: String,
    pub dkim_result: String,
    pub disposition: String,
    pub count: u64,
    /// `header_from` identifier domain; `"Unknown"` when the report omits it.
    pub domain: String,
}

/// Summary statistics for one batch of records, immutable once computed.
///
/// `passed_count + failed_count == total_emails` holds by construction:
/// `failed_count` is derived as the remainder, not summed independently.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisReport {
    pub total_emails: u64,
    pub passed_count: u64,
    pub failed_count: u64,
    pub unauthorized_count: u64,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub domains_with_failures: HashSet<String>,
    pub recommendation: Recommendation,
}

//! Analysis Module
//!
//! Folds a merged batch of normalized records into summary statistics and a
//! policy recommendation. Every aggregate is an order-independent sum or set,
//! so the result depends only on the multiset of input records.

use crate::error::{AdvisorError, Result};
use crate::models::{AnalysisReport, NormalizedRecord};
use crate::policy;
use std::collections::HashSet;

/// Analyzes a batch of records and derives the policy recommendation.
///
/// # Errors
///
/// Returns [`AdvisorError::NoData`] when the summed message count is zero
/// (empty batch, or every record carries a zero count). Callers must treat
/// that as a terminal state: rates are never computed against a zero
/// denominator.
pub fn analyze(records: &[NormalizedRecord]) -> Result<AnalysisReport> {
    let total_emails: u64 = records.iter().map(|r| r.count).sum();
    if total_emails == 0 {
        return Err(AdvisorError::NoData);
    }

    let passed_count: u64 = records
        .iter()
        .filter(|r| r.spf_result == "pass" && r.dkim_result == "pass")
        .map(|r| r.count)
        .sum();
    // Remainder, not an independent strict-fail sum: a record that is neither
    // fully authenticated nor disposition-failing still lands here.
    let failed_count = total_emails - passed_count;

    let unauthorized: Vec<&NormalizedRecord> =
        records.iter().filter(|r| r.disposition != "pass").collect();
    let unauthorized_count: u64 = unauthorized.iter().map(|r| r.count).sum();

    let pass_rate = (passed_count as f64 / total_emails as f64) * 100.0;
    let fail_rate = 100.0 - pass_rate;

    // Set membership is not gated on count: a zero-count unauthorized record
    // still contributes its domain.
    let domains_with_failures: HashSet<String> =
        unauthorized.iter().map(|r| r.domain.clone()).collect();

    let recommendation = policy::advise(fail_rate, unauthorized_count);

    Ok(AnalysisReport {
        total_emails,
        passed_count,
        failed_count,
        unauthorized_count,
        pass_rate,
        fail_rate,
        domains_with_failures,
        recommendation,
    })
}

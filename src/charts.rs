//! Chart Data Module
//!
//! Computes the derived counts consumed by visualization collaborators: the
//! pie-chart segments (authenticated / other failures / unauthorized) and the
//! per-domain failure bars. Classification follows the same rules as the
//! analysis module so that charts and the textual summary never disagree.

use crate::models::NormalizedRecord;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChartData {
    /// Messages passing both SPF and DKIM.
    pub passed: u64,
    /// Remainder after removing passed and unauthorized volume, clamped at
    /// zero since the two classifications can overlap.
    pub other_failures: u64,
    /// Messages whose disposition is not "pass".
    pub unauthorized: u64,
    /// For each domain appearing in unauthorized records: the summed count of
    /// all records carrying that domain, highest volume first.
    pub domain_failures: Vec<(String, u64)>,
}

/// Derives chart data from the merged record list.
///
/// Returns `None` when every segment is zero; collaborators skip rendering in
/// that case.
pub fn chart_data(records: &[NormalizedRecord]) -> Option<ChartData> {
    let total: u64 = records.iter().map(|r| r.count).sum();
    let passed: u64 = records
        .iter()
        .filter(|r| r.spf_result == "pass" && r.dkim_result == "pass")
        .map(|r| r.count)
        .sum();
    let unauthorized_records: Vec<&NormalizedRecord> =
        records.iter().filter(|r| r.disposition != "pass").collect();
    let unauthorized: u64 = unauthorized_records.iter().map(|r| r.count).sum();
    let other_failures = total.saturating_sub(passed).saturating_sub(unauthorized);

    if passed + other_failures + unauthorized == 0 {
        return None;
    }

    let mut domains: Vec<String> = unauthorized_records
        .iter()
        .map(|r| r.domain.clone())
        .collect();
    domains.sort();
    domains.dedup();

    let mut domain_failures: Vec<(String, u64)> = domains
        .into_iter()
        .map(|domain| {
            let volume = records
                .iter()
                .filter(|r| r.domain == domain)
                .map(|r| r.count)
                .sum();
            (domain, volume)
        })
        .collect();
    domain_failures.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Some(ChartData {
        passed,
        other_failures,
        unauthorized,
        domain_failures,
    })
}

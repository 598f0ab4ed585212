//! Pipeline Driver Module
//!
//! Composes extraction, aggregation and the policy advisor over a batch of
//! report files. Extraction failures are isolated per file: a malformed
//! report contributes zero records and the rest of the batch proceeds. The
//! merged record list preserves file order and in-document record order.

use crate::analysis;
use crate::config::Config;
use crate::error::Result;
use crate::file_handlers::load_report;
use crate::models::{AnalysisReport, NormalizedRecord};
use crate::xml_parser::parse_dmarc_report;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One skipped input file and the reason it was skipped.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of processing one batch of report files.
///
/// `report` is `None` in the terminal no-data state: either no file yielded
/// records, or every record carried a zero count. Downstream consumers must
/// branch on it before reading rate fields.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<NormalizedRecord>,
    pub failures: Vec<FileFailure>,
    pub report: Option<AnalysisReport>,
}

/// Scans a directory for report files (`.xml`, `.zip`, `.gz`), sorted by
/// path, capped at the configured per-batch bound.
pub fn collect_report_paths(dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".xml") || name.ends_with(".zip") || name.ends_with(".gz") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.truncate(config.max_reports_per_batch);
    Ok(paths)
}

/// Loads one report file and parses every XML document it contains.
/// Any error fails the whole file.
fn extract_file(path: &Path, config: &Config) -> Result<Vec<NormalizedRecord>> {
    let documents = load_report(path, config)?;
    let mut records = Vec::new();
    for xml in &documents {
        records.extend(parse_dmarc_report(xml)?);
    }
    Ok(records)
}

/// Processes a batch of report files end to end.
///
/// Extraction is independent per file and runs in parallel; `collect()` keeps
/// input order, so the concatenation stays deterministic regardless of
/// scheduling. Aggregation runs once over the merged list.
pub fn run(paths: &[PathBuf], config: &Config) -> BatchOutcome {
    let extracted: Vec<Result<Vec<NormalizedRecord>>> = paths
        .par_iter()
        .map(|path| extract_file(path, config))
        .collect();

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in paths.iter().zip(extracted) {
        match result {
            Ok(parsed) => {
                log::debug!("Parsed {} records from {}", parsed.len(), path.display());
                records.extend(parsed);
            }
            Err(e) => {
                log::warn!("Skipping report {}: {}", path.display(), e);
                failures.push(FileFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    // The only analysis failure is the no-data condition, which maps to the
    // absent report.
    let report = analysis::analyze(&records).ok();

    BatchOutcome {
        records,
        failures,
        report,
    }
}

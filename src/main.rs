//! dmarc-advisor - DMARC Aggregate-Report Policy Advisor
//!
//! This tool parses DMARC aggregate reports from XML, ZIP, or GZIP files,
//! merges the records across the whole batch, and derives a policy
//! recommendation (`reject`, `quarantine`, or staying at `none`) from the
//! observed pass/fail ratios and unauthorized-source volume.
//!
//! Results are rendered as a table, CSV, or JSON, optionally exported to a
//! JSON report file and posted to a configured webhook.

mod analysis;
mod charts;
mod config;
mod error;
mod file_handlers;
mod models;
mod pipeline;
mod policy;
mod webhook;
mod xml_parser;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use config::Config;
use models::{AnalysisReport, NormalizedRecord};
use prettytable::{row, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use webhook::WebhookHandler;

/// CLI arguments for dmarc-advisor.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DMARC aggregate report analyzer and policy advisor",
    long_about = "dmarc-advisor parses DMARC aggregate reports (XML, ZIP, or GZIP), \
                  aggregates authentication results across the batch, and recommends \
                  a DMARC policy based on pass/fail ratios.\n\n\
                  USAGE:\n  dmarc-advisor <INPUT> [--output <table|csv|json>] [--report <FILE>] [--verbose]"
)]
struct Cli {
    /// Path to a DMARC report file (.xml, .zip, .gz) or a directory of reports
    #[arg(value_parser)]
    input: PathBuf,

    /// Output format: table, csv, json
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Write the full JSON analysis payload to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Supported output formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// The exported analysis payload: summary statistics plus the merged records.
#[derive(Serialize)]
struct AnalysisPayload<'a> {
    summary: &'a AnalysisReport,
    records: &'a [NormalizedRecord],
}

/// Renders the summary statistics as a terminal table.
fn print_summary(summary: &AnalysisReport) {
    println!("{}", "DMARC Analysis Summary".bold().blue());
    println!("{}", "----------------------------".dimmed());

    let mut domains: Vec<&String> = summary.domains_with_failures.iter().collect();
    domains.sort();
    let domains_str = if domains.is_empty() {
        "None".to_string()
    } else {
        domains
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new();
    table.add_row(row!["Total Emails", summary.total_emails]);
    table.add_row(row!["SPF/DKIM Pass Count", summary.passed_count]);
    table.add_row(row!["Failed Count", summary.failed_count]);
    table.add_row(row!["Unauthorized Email Count", summary.unauthorized_count]);
    table.add_row(row!["Pass Rate", format!("{:.1}%", summary.pass_rate)]);
    table.add_row(row!["Fail Rate", format!("{:.1}%", summary.fail_rate)]);
    table.add_row(row!["Domains with Failures", domains_str]);
    table.add_row(row!["Recommendation", summary.recommendation.to_string()]);
    table.printstd();
}

/// Renders the chart-data breakdown: authentication segments and the domains
/// causing failures, by volume.
fn print_breakdown(records: &[NormalizedRecord]) {
    let Some(charts) = charts::chart_data(records) else {
        println!("{}", "No data available for visualization.".yellow());
        return;
    };

    println!("\n{}", "Authentication Breakdown".bold().blue());
    let mut segments = Table::new();
    segments.add_row(row!["SPF+DKIM Pass", charts.passed]);
    segments.add_row(row!["Failures", charts.other_failures]);
    segments.add_row(row!["Unauthorized Emails", charts.unauthorized]);
    segments.printstd();

    if !charts.domain_failures.is_empty() {
        println!("\n{}", "Domains Causing DMARC Failures".bold().blue());
        let mut table = Table::new();
        table.add_row(row!["Domain", "Failed Email Count"]);
        for (domain, volume) in &charts.domain_failures {
            table.add_row(Row::new(vec![
                Cell::new(domain),
                Cell::new(&volume.to_string()),
            ]));
        }
        table.printstd();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity.
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    println!(
        "{}\n{}\n",
        "dmarc-advisor - DMARC Policy Advisor".bold().green(),
        "Parsing, aggregating & analyzing DMARC data".dimmed()
    );

    let config = Config::new().context("Failed to load configuration")?;

    let paths = if cli.input.is_dir() {
        pipeline::collect_report_paths(&cli.input, &config)
            .context("Failed to scan report directory")?
    } else {
        vec![cli.input.clone()]
    };

    if paths.is_empty() {
        println!("{}", "No DMARC reports found.".yellow());
        return Ok(());
    }

    log::info!("Processing {} report file(s)", paths.len());
    let outcome = pipeline::run(&paths, &config);

    for failure in &outcome.failures {
        println!(
            "{} {}: {}",
            "Skipped".yellow().bold(),
            failure.path.display(),
            failure.reason
        );
    }

    if outcome.records.is_empty() {
        println!("{}", "No data parsed from the reports.".yellow());
        return Ok(());
    }

    let Some(summary) = outcome.report.as_ref() else {
        // Records exist but every count is zero: terminal no-data state,
        // nothing to visualize or export.
        println!("{}", "No data available for analysis.".yellow());
        return Ok(());
    };

    match cli.output {
        OutputFormat::Json => {
            let payload = AnalysisPayload {
                summary,
                records: &outcome.records,
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for record in &outcome.records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Table => {
            print_summary(summary);
            print_breakdown(&outcome.records);
        }
    }

    if let Some(path) = &cli.report {
        let payload = AnalysisPayload {
            summary,
            records: &outcome.records,
        };
        std::fs::write(path, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Analysis report written to {}", path.display());
    }

    if let Some(url) = &config.webhook_url {
        log::info!("Sending results to webhook: {}", url);
        let handler = WebhookHandler::new(url, Duration::from_secs(config.webhook_timeout), 3)?;
        handler
            .send(summary.clone(), outcome.records.clone())
            .await
            .context("Failed to send webhook")?;
    }

    log::info!("{}", "Analysis complete!".bold().cyan());
    Ok(())
}

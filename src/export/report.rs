//! Summary report over a previously exported CSV
//!
//! This collaborator is fully decoupled from the scraper: it reads an export
//! by path, derives a few analysis fields, and prints a summary table. It
//! has no feedback path into the scrape itself.

use crate::export::{parse_datetime, ExportResult};
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Labels for the portal's numeric event-type codes
fn event_type_label(code: i64) -> &'static str {
    match code {
        7 => "Open Tender",
        6 => "Limited Tender",
        5 => "Request for Quotation",
        4 => "Single Source",
        3 => "Framework Agreement",
        2 => "Two-Stage Tender",
        1 => "Other",
        _ => "Unknown",
    }
}

/// Labels for the portal's numeric event-status codes
fn event_status_label(code: i64) -> &'static str {
    match code {
        0 => "Draft",
        1 => "Active",
        2 => "Closed",
        3 => "Cancelled",
        4 => "Awarded",
        _ => "Unknown",
    }
}

/// Summary derived from one exported CSV
#[derive(Debug, Clone, Default)]
pub struct TenderReport {
    /// Rows in the export
    pub total_tenders: u64,

    /// Distinct non-empty buyer organization names
    pub unique_buyers: u64,

    /// Rows with a non-empty awarded participant name
    pub awarded_tenders: u64,

    /// Row counts per event-type label
    pub tenders_by_type: HashMap<String, u64>,

    /// Row counts per event-status label
    pub tenders_by_status: HashMap<String, u64>,

    /// Mean of positive publish-to-end durations, in days
    pub mean_duration_days: Option<f64>,

    /// Median of positive publish-to-end durations, in days
    pub median_duration_days: Option<f64>,

    /// Earliest parsable publish date
    pub earliest_publish: Option<NaiveDateTime>,

    /// Latest parsable publish date
    pub latest_publish: Option<NaiveDateTime>,
}

impl TenderReport {
    /// Share of rows carrying an awardee, as a percentage
    pub fn award_rate(&self) -> f64 {
        if self.total_tenders == 0 {
            return 0.0;
        }
        (self.awarded_tenders as f64 / self.total_tenders as f64) * 100.0
    }

    /// The event-type label with the highest row count
    pub fn most_common_type(&self) -> Option<&str> {
        self.tenders_by_type
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(label, _)| label.as_str())
    }
}

/// Loads a report from an exported CSV file
///
/// Columns are looked up by name; an export lacking one of them simply
/// contributes nothing to the derived fields that need it.
pub fn load_report(path: &Path) -> ExportResult<TenderReport> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|header| header == name);
    let publish_idx = column("publishDate");
    let end_idx = column("endDate");
    let type_idx = column("eventType");
    let status_idx = column("eventStatus");
    let buyer_idx = column("buyerOrganizationName");
    let awardee_idx = column("awardedParticipantName");

    let mut report = TenderReport::default();
    let mut buyers = HashSet::new();
    let mut durations: Vec<i64> = Vec::new();

    for record in reader.records() {
        let record = record?;
        report.total_tenders += 1;

        let field =
            |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        if let Some(publish) = parse_datetime(field(publish_idx)) {
            report.earliest_publish = Some(match report.earliest_publish {
                Some(current) => current.min(publish),
                None => publish,
            });
            report.latest_publish = Some(match report.latest_publish {
                Some(current) => current.max(publish),
                None => publish,
            });

            if let Some(end) = parse_datetime(field(end_idx)) {
                let days = (end - publish).num_days();
                if days > 0 {
                    durations.push(days);
                }
            }
        }

        let type_label = field(type_idx)
            .parse::<i64>()
            .map(event_type_label)
            .unwrap_or("Unknown");
        *report.tenders_by_type.entry(type_label.to_string()).or_insert(0) += 1;

        let status_label = field(status_idx)
            .parse::<i64>()
            .map(event_status_label)
            .unwrap_or("Unknown");
        *report
            .tenders_by_status
            .entry(status_label.to_string())
            .or_insert(0) += 1;

        let buyer = field(buyer_idx);
        if !buyer.is_empty() {
            buyers.insert(buyer.to_string());
        }

        if !field(awardee_idx).is_empty() {
            report.awarded_tenders += 1;
        }
    }

    report.unique_buyers = buyers.len() as u64;

    if !durations.is_empty() {
        durations.sort_unstable();
        let sum: i64 = durations.iter().sum();
        report.mean_duration_days = Some(sum as f64 / durations.len() as f64);

        let mid = durations.len() / 2;
        let median = if durations.len() % 2 == 0 {
            (durations[mid - 1] + durations[mid]) as f64 / 2.0
        } else {
            durations[mid] as f64
        };
        report.median_duration_days = Some(median);
    }

    Ok(report)
}

/// Prints the summary table to stdout
pub fn print_report(report: &TenderReport) {
    println!("=== Tender Summary ===\n");

    println!("{:.<40} {}", "Total Tenders", report.total_tenders);
    println!("{:.<40} {}", "Unique Buyers", report.unique_buyers);
    println!("{:.<40} {}", "Awarded Tenders", report.awarded_tenders);
    println!("{:.<40} {:.2}%", "Award Rate", report.award_rate());

    if let Some(mean) = report.mean_duration_days {
        println!("{:.<40} {:.1}", "Average Duration (days)", mean);
    }
    if let Some(median) = report.median_duration_days {
        println!("{:.<40} {:.1}", "Median Duration (days)", median);
    }
    if let Some(most_common) = report.most_common_type() {
        println!("{:.<40} {}", "Most Common Event Type", most_common);
    }
    if let (Some(earliest), Some(latest)) = (report.earliest_publish, report.latest_publish) {
        println!(
            "{:.<40} {} to {}",
            "Date Range",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        );
    }

    println!("\nTenders by Type:");
    let mut by_type: Vec<_> = report.tenders_by_type.iter().collect();
    by_type.sort_by(|a, b| b.1.cmp(a.1));
    for (label, count) in by_type {
        println!("  {}: {}", label, count);
    }

    println!("\nTenders by Status:");
    let mut by_status: Vec<_> = report.tenders_by_status.iter().collect();
    by_status.sort_by(|a, b| b.1.cmp(a.1));
    for (label, count) in by_status {
        println!("  {}: {}", label, count);
    }
}

// Export of audited sites to CSV or JSON

use crate::data::Database;
use crate::error::Result;
use crate::model::SiteStatus;
use crate::scoring::LeadScorer;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const NO_ISSUES_SUMMARY: &str = "No issues found - site performing well";

pub const CSV_HEADERS: [&str; 18] = [
    "Domain",
    "Category",
    "Location",
    "Lead Score",
    "Summary",
    "Performance Score",
    "SEO Score",
    "UX Score",
    "Load Time (s)",
    "Top Issue 1",
    "Top Issue 2",
    "Top Issue 3",
    "Email Addresses",
    "Phone Numbers",
    "Email Subject",
    "Email Body",
    "LinkedIn Message",
    "Audited At",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// One audited site, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub domain: String,
    pub category: String,
    pub location: String,
    pub lead_score: u32,
    pub summary: String,
    pub performance_score: u32,
    pub seo_score: u32,
    pub ux_score: u32,
    pub load_time: f64,
    pub top_issues: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub email_subject: String,
    pub email_body: String,
    pub linkedin_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audited_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStats {
    pub total: usize,
    pub qualified: usize,
    pub good: usize,
    pub with_email: usize,
    pub without_email: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Nothing audited yet; no file was written.
    Empty,
    Written {
        path: PathBuf,
        rows: Vec<ExportRow>,
        stats: ExportStats,
    },
}

/// Every audited site. Sites without a lead fall back to a baseline score
/// computed from their audit.
pub fn gather_export_rows(db: &Database, scorer: &LeadScorer) -> Result<Vec<ExportRow>> {
    let mut rows = Vec::new();

    for site in db
        .get_sites()?
        .into_iter()
        .filter(|s| s.status == SiteStatus::Audited)
    {
        let audit = db.get_audit(&site.id)?;
        let lead = db.get_lead(&site.id)?;
        let message = db.get_outreach(&site.id)?;

        let score = match (&lead, &audit) {
            (Some(lead), _) => lead.score,
            (None, Some(record)) => scorer.baseline_score(&record.audit),
            (None, None) => 0,
        };

        let contacts = lead
            .as_ref()
            .map(|l| l.contacts.clone())
            .or_else(|| audit.as_ref().map(|a| a.audit.contacts.clone()))
            .unwrap_or_default();

        let category = if site.category.is_empty() {
            "Unknown".to_string()
        } else {
            site.category.clone()
        };

        rows.push(ExportRow {
            domain: site.domain.clone(),
            category,
            location: site.location.clone(),
            lead_score: score,
            summary: lead
                .as_ref()
                .map(|l| l.summary.clone())
                .unwrap_or_else(|| NO_ISSUES_SUMMARY.to_string()),
            performance_score: audit.as_ref().map_or(0, |a| a.audit.performance.score),
            seo_score: audit.as_ref().map_or(0, |a| a.audit.seo.score),
            ux_score: audit.as_ref().map_or(0, |a| a.audit.ux.score),
            load_time: audit.as_ref().map_or(0.0, |a| a.audit.performance.load_time),
            top_issues: lead.map(|l| l.top_issues).unwrap_or_default(),
            emails: contacts.emails,
            phones: contacts.phones,
            email_subject: message
                .as_ref()
                .map(|m| m.email.subject.clone())
                .unwrap_or_default(),
            email_body: message
                .as_ref()
                .map(|m| m.email.body.clone())
                .unwrap_or_default(),
            linkedin_message: message
                .map(|m| m.linked_in.message)
                .unwrap_or_default(),
            audited_at: audit.map(|a| a.audited_at),
        });
    }

    Ok(rows)
}

pub fn compute_stats(rows: &[ExportRow], qualification_score: u32) -> ExportStats {
    let total = rows.len();
    let qualified = rows
        .iter()
        .filter(|r| r.lead_score >= qualification_score)
        .count();
    let with_email = rows.iter().filter(|r| !r.emails.is_empty()).count();
    let average_score = if total == 0 {
        0.0
    } else {
        rows.iter().map(|r| r.lead_score as f64).sum::<f64>() / total as f64
    };

    ExportStats {
        total,
        qualified,
        good: total - qualified,
        with_email,
        without_email: total - with_email,
        average_score,
    }
}

/// Rows ordered by score, highest first. Equal scores keep site order.
pub fn sorted_by_score(rows: &[ExportRow]) -> Vec<&ExportRow> {
    let mut sorted: Vec<&ExportRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.lead_score.cmp(&a.lead_score));
    sorted
}

pub fn generate_csv_report(rows: &[ExportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for row in rows {
        let top_issue = |idx: usize| row.top_issues.get(idx).cloned().unwrap_or_default();
        writer.write_record([
            row.domain.clone(),
            row.category.clone(),
            row.location.clone(),
            row.lead_score.to_string(),
            row.summary.clone(),
            row.performance_score.to_string(),
            row.seo_score.to_string(),
            row.ux_score.to_string(),
            format!("{:.2}", row.load_time),
            top_issue(0),
            top_issue(1),
            top_issue(2),
            row.emails.join("; "),
            row.phones.join("; "),
            row.email_subject.clone(),
            row.email_body.clone(),
            row.linkedin_message.clone(),
            row.audited_at.map(format_iso8601_timestamp).unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

pub fn generate_json_report(
    rows: &[ExportRow],
    stats: &ExportStats,
) -> std::result::Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "leadscout",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": stats,
            "sites": rows
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Gather, render and write the export. Writes nothing when no site has
/// been audited yet.
pub fn export_sites(
    db: &Database,
    scorer: &LeadScorer,
    path: &Path,
    format: ReportFormat,
) -> Result<ExportOutcome> {
    let rows = gather_export_rows(db, scorer)?;
    if rows.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let stats = compute_stats(&rows, scorer.qualification_score());
    let content = match format {
        ReportFormat::Csv => generate_csv_report(&rows)?,
        ReportFormat::Json => generate_json_report(&rows, &stats)?,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    save_report(&content, path)?;
    info!("Exported {} sites to {}", rows.len(), path.display());

    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows,
        stats,
    })
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn format_iso8601_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.to_rfc3339()
}

/// `2024-01-31 09:15:00 UTC`, for terminal listings
pub fn format_display_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

// Site import from CSV files and manual entry

use crate::data::{AddOutcome, Database};
use crate::error::{CoreError, Result};
use crate::model::NewSite;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const SAMPLE_CSV: &str = "domain,category,location,source
example.com,SaaS,San Francisco,manual
dentist-site.com,Healthcare,New York,google_maps
lawfirm.com,Legal,Chicago,directory
fitness-gym.com,Fitness,Los Angeles,manual
restaurant.com,Food & Beverage,Austin,google_maps
";

const DEFAULT_CATEGORY: &str = "Unknown";
const DEFAULT_SOURCE: &str = "csv_import";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub added: Vec<String>,
    /// (domain, reason)
    pub skipped: Vec<(String, String)>,
}

fn csv_error(err: &csv::Error, fallback_line: usize) -> CoreError {
    let line = err
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(fallback_line);
    CoreError::Csv {
        line,
        message: err.to_string(),
    }
}

/// Parse a site list with a `domain,category,location,source` header.
///
/// Column order follows the header; only `domain` is required. Quoted
/// fields may contain commas, doubled quotes and line breaks.
pub fn parse_sites_csv(content: &str) -> Result<Vec<NewSite>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(&e, 1))?
        .iter()
        .map(|c| c.to_lowercase())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Ok(Vec::new());
    }

    let column = |name: &str| columns.iter().position(|c| c == name);
    let domain_idx = column("domain").ok_or_else(|| CoreError::Csv {
        line: 1,
        message: "header has no 'domain' column".to_string(),
    })?;
    let category_idx = column("category");
    let location_idx = column("location");
    let source_idx = column("source");

    let mut sites = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&e, 0))?;
        let line_no = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or_default();

        let value = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let domain = value(Some(domain_idx)).ok_or_else(|| CoreError::Csv {
            line: line_no,
            message: "missing domain".to_string(),
        })?;

        sites.push(NewSite {
            domain,
            category: value(category_idx).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            location: value(location_idx).unwrap_or_default(),
            source: value(source_idx).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        });
    }

    debug!("Parsed {} sites from CSV", sites.len());
    Ok(sites)
}

pub fn load_sites_csv(path: &Path) -> Result<Vec<NewSite>> {
    let content = fs::read_to_string(path)?;
    parse_sites_csv(&content)
}

/// Add every site, reporting duplicates instead of failing on them.
pub fn import_sites(db: &Database, sites: &[NewSite]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for site in sites {
        match db.add_site(site)? {
            AddOutcome::Added(added) => summary.added.push(added.domain),
            outcome @ AddOutcome::Duplicate => summary
                .skipped
                .push((site.domain.clone(), outcome.message().to_string())),
        }
    }

    info!(
        "Imported {} sites, skipped {}",
        summary.added.len(),
        summary.skipped.len()
    );
    Ok(summary)
}

pub fn write_sample_csv(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, SAMPLE_CSV)?;
    Ok(())
}

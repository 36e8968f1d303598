use crate::config::PipelineConfig;
use crate::data::{Database, current_timestamp};
use crate::error::Result;
use crate::model::{Lead, Site, SiteStatus};
use crate::outreach::OutreachGenerator;
use crate::scoring::{DEFAULT_TOP_ISSUES, LeadScorer};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use leadscout_scanner::Auditor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What happened to one site during a run
#[derive(Debug, Clone, PartialEq)]
pub enum SiteOutcome {
    Qualified { score: u32 },
    NotQualified { score: u32 },
    /// The homepage could not be fetched
    Failed(String),
    /// Anything else went wrong after the fetch
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteReport {
    pub site_id: String,
    pub domain: String,
    pub outcome: SiteOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub total_sites: usize,
    pub to_audit: usize,
    pub processed: usize,
    pub qualified: usize,
    pub failed: usize,
    pub errored: usize,
    pub reports: Vec<SiteReport>,
}

/// Callback for reporting each finished site
pub type PipelineProgressCallback = Arc<dyn Fn(&SiteReport) + Send + Sync>;

/// Sequential fetch -> audit -> score -> outreach driver.
pub struct Pipeline {
    auditor: Auditor,
    scorer: LeadScorer,
    outreach: OutreachGenerator,
    delay: Duration,
    show_progress_bars: bool,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let auditor = Auditor::with_settings(
            config.audit.timeout_secs,
            &config.audit.user_agent,
            config.audit.max_redirects,
        )?;

        Ok(Self {
            auditor,
            scorer: LeadScorer::new(config.scoring.clone(), config.weights.clone()),
            outreach: OutreachGenerator::new(),
            delay: config.audit.request_delay,
            show_progress_bars: false,
        })
    }

    pub fn with_progress_bars(mut self, show: bool) -> Self {
        self.show_progress_bars = show;
        self
    }

    pub fn scorer(&self) -> &LeadScorer {
        &self.scorer
    }

    /// Audit every pending or validated site, one at a time.
    pub async fn run(
        &self,
        db: &Database,
        progress_callback: Option<PipelineProgressCallback>,
    ) -> Result<PipelineSummary> {
        let total_sites = db.get_sites()?.len();
        let sites = db.get_sites_to_audit()?;
        info!("{} of {} sites to audit", sites.len(), total_sites);

        let mut summary = PipelineSummary {
            total_sites,
            to_audit: sites.len(),
            ..Default::default()
        };

        for (idx, site) in sites.iter().enumerate() {
            let spinner = self.site_spinner(&site.domain);

            let outcome = match self.process_site(db, site).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = e.to_string();
                    warn!("Error processing {}: {}", site.domain, message);
                    db.update_site_status(&site.id, SiteStatus::Error, Some(&message))?;
                    SiteOutcome::Errored(message)
                }
            };

            match &outcome {
                SiteOutcome::Qualified { .. } => {
                    summary.processed += 1;
                    summary.qualified += 1;
                }
                SiteOutcome::NotQualified { .. } => summary.processed += 1,
                SiteOutcome::Failed(_) => summary.failed += 1,
                SiteOutcome::Errored(_) => summary.errored += 1,
            }

            let report = SiteReport {
                site_id: site.id.clone(),
                domain: site.domain.clone(),
                outcome,
            };
            if let Some(pb) = spinner {
                pb.finish_with_message(describe_report(&report));
            }
            if let Some(ref callback) = progress_callback {
                callback(&report);
            }
            summary.reports.push(report);

            if idx + 1 < sites.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "Pipeline complete: {} processed, {} qualified, {} failed, {} errors",
            summary.processed, summary.qualified, summary.failed, summary.errored
        );
        Ok(summary)
    }

    /// Audit, score and persist one site. A fetch failure marks the site
    /// failed and is not an error; any other failure is returned.
    pub async fn process_site(&self, db: &Database, site: &Site) -> Result<SiteOutcome> {
        let audit = match self.auditor.run_full_audit(&site.domain).await {
            Ok(audit) => audit,
            Err(e) => {
                let message = e.to_string();
                warn!("Audit of {} failed: {}", site.domain, message);
                db.update_site_status(&site.id, SiteStatus::Failed, Some(&message))?;
                return Ok(SiteOutcome::Failed(message));
            }
        };

        db.save_audit(&site.id, &audit)?;

        let result = self.scorer.calculate_score(&audit);
        let top_issues = self.scorer.top_issues(&result, DEFAULT_TOP_ISSUES);

        let outcome = if result.qualified {
            let lead = Lead {
                site_id: site.id.clone(),
                domain: site.domain.clone(),
                score: result.score,
                issues: result.issues,
                top_issues,
                summary: result.summary,
                contacts: audit.contacts.clone(),
                created_at: current_timestamp(),
            };
            db.save_lead(&lead)?;

            let message = self
                .outreach
                .generate_message(site, &lead.top_issues, &lead.contacts);
            db.save_outreach(&message)?;

            SiteOutcome::Qualified { score: result.score }
        } else {
            if db.remove_lead(&site.id)? {
                info!("{} no longer qualifies, dropped its lead", site.domain);
            }
            SiteOutcome::NotQualified { score: result.score }
        };

        db.mark_site_audited(&site.id)?;
        Ok(outcome)
    }

    fn site_spinner(&self, domain: &str) -> Option<ProgressBar> {
        if !self.show_progress_bars {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Auditing {}...", domain));
        Some(pb)
    }
}

pub fn describe_report(report: &SiteReport) -> String {
    match &report.outcome {
        SiteOutcome::Qualified { score } => format!(
            "{} {}",
            "✓".green().bold(),
            format!("{} - QUALIFIED (Score: {})", report.domain, score).green()
        ),
        SiteOutcome::NotQualified { score } => format!(
            "{} {}",
            "⚠".yellow().bold(),
            format!("{} - Not qualified (Score: {})", report.domain, score).yellow()
        ),
        SiteOutcome::Failed(message) => format!(
            "{} Failed: {} - {}",
            "✗".red().bold(),
            report.domain,
            message
        ),
        SiteOutcome::Errored(message) => format!(
            "{} Error: {} - {}",
            "✗".red().bold(),
            report.domain,
            message
        ),
    }
}

// Static rubric and run settings

use leadscout_scanner::auditor::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, SLOW_LOAD_SECS,
};
use std::time::Duration;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/leadscout/";
pub const DATABASE_FILE: &str = "leadscout.db";
pub const DEFAULT_INPUT_CSV: &str = "./data/input-sites.csv";
pub const DEFAULT_OUTPUT_CSV: &str = "./data/qualified-leads.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub performance_threshold: u32,
    pub seo_threshold: u32,
    /// Only consulted for the fallback score of non-lead sites on export
    pub ux_threshold: u32,
    pub qualification_score: u32,
    pub slow_load_secs: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            performance_threshold: 60,
            seo_threshold: 70,
            ux_threshold: 70,
            qualification_score: 7,
            slow_load_secs: SLOW_LOAD_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub low_performance: u32,
    pub low_seo: u32,
    pub low_ux: u32,
    pub no_meta_description: u32,
    pub missing_h1: u32,
    pub no_cta: u32,
    pub no_contact_form: u32,
    pub slow_load_time: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            low_performance: 3,
            low_seo: 2,
            low_ux: 2,
            no_meta_description: 2,
            missing_h1: 2,
            no_cta: 3,
            no_contact_form: 2,
            slow_load_time: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,
    /// Pause after each site
    pub request_delay: Duration,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            request_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub scoring: ScoringConfig,
    pub weights: Weights,
    pub audit: AuditSettings,
}

impl PipelineConfig {
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.audit.timeout_secs = timeout_secs;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.audit.request_delay = delay;
        self
    }

    pub fn with_qualification_score(mut self, score: u32) -> Self {
        self.scoring.qualification_score = score;
        self
    }
}

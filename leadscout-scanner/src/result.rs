use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A homepage as returned by a single timed GET.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub requested_url: String,
    /// URL after redirects were followed
    pub url: String,
    pub status_code: u16,
    pub body: String,
    pub load_time: Duration,
}

impl FetchedPage {
    pub fn load_time_secs(&self) -> f64 {
        self.load_time.as_secs_f64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoDetails {
    pub title: String,
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub images_without_alt: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoAudit {
    pub score: u32,
    pub issues: Vec<String>,
    pub details: SeoDetails,
}

impl SeoAudit {
    pub fn missing_meta_description(&self) -> bool {
        self.details
            .meta_description
            .as_ref()
            .is_none_or(|d| d.chars().count() < crate::auditor::MIN_META_DESCRIPTION_LEN)
    }

    /// True when the page has no H1 or more than one.
    pub fn h1_problem(&self) -> bool {
        self.details.h1_count != 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UxDetails {
    pub has_cta: bool,
    pub cta_count: usize,
    pub has_contact_form: bool,
    pub has_contact_link: bool,
    pub has_social_proof: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UxAudit {
    pub score: u32,
    pub issues: Vec<String>,
    pub details: UxDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAudit {
    pub score: u32,
    /// Seconds, rounded to two decimals
    pub load_time: f64,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub social_links: Vec<String>,
}

/// Everything captured about one site's homepage at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAudit {
    pub url: String,
    pub seo: SeoAudit,
    pub ux: UxAudit,
    pub performance: PerformanceAudit,
    pub contacts: Contacts,
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

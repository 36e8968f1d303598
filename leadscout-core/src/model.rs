use leadscout_scanner::SiteAudit;
use leadscout_scanner::result::Contacts;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Pending,
    Validated,
    Audited,
    Failed,
    Error,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Pending => "pending",
            SiteStatus::Validated => "validated",
            SiteStatus::Audited => "audited",
            SiteStatus::Failed => "failed",
            SiteStatus::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SiteStatus::Pending),
            "validated" => Some(SiteStatus::Validated),
            "audited" => Some(SiteStatus::Audited),
            "failed" => Some(SiteStatus::Failed),
            "error" => Some(SiteStatus::Error),
            _ => None,
        }
    }

    /// Statuses the pipeline picks up on its next run.
    pub fn is_auditable(&self) -> bool {
        matches!(self, SiteStatus::Pending | SiteStatus::Validated)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub domain: String,
    pub category: String,
    pub location: String,
    pub source: String,
    pub status: SiteStatus,
    pub added_at: i64,
    pub last_audit_at: Option<i64>,
    pub error: Option<String>,
}

/// A site as supplied by a user or an import file, before it gets an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSite {
    pub domain: String,
    pub category: String,
    pub location: String,
    pub source: String,
}

impl NewSite {
    pub fn manual(domain: &str, category: &str, location: &str) -> Self {
        let category = category.trim();
        Self {
            domain: domain.trim().to_string(),
            category: if category.is_empty() {
                "Unknown".to_string()
            } else {
                category.to_string()
            },
            location: location.trim().to_string(),
            source: "manual".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LowPerformance,
    LowSeo,
    NoMetaDescription,
    MissingH1,
    NoCta,
    NoContactForm,
    SlowLoadTime,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::LowPerformance => "low_performance",
            IssueKind::LowSeo => "low_seo",
            IssueKind::NoMetaDescription => "no_meta_description",
            IssueKind::MissingH1 => "missing_h1",
            IssueKind::NoCta => "no_cta",
            IssueKind::NoContactForm => "no_contact_form",
            IssueKind::SlowLoadTime => "slow_load_time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub site_id: String,
    pub audit: SiteAudit,
    pub audited_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub site_id: String,
    pub domain: String,
    pub score: u32,
    pub issues: Vec<Issue>,
    pub top_issues: Vec<String>,
    pub summary: String,
    pub contacts: Contacts,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInDraft {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachMessage {
    pub site_id: String,
    pub email: EmailDraft,
    pub linked_in: LinkedInDraft,
    pub generated_at: i64,
}

/// A lead joined with the records that share its site id.
#[derive(Debug, Clone)]
pub struct QualifiedLead {
    pub lead: Lead,
    pub site: Option<Site>,
    pub audit: Option<AuditRecord>,
    pub message: Option<OutreachMessage>,
}

// Lead scoring rubric

use crate::config::{ScoringConfig, Weights};
use crate::model::{Issue, IssueKind, Severity};
use leadscout_scanner::SiteAudit;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_ISSUES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: u32,
    pub issues: Vec<Issue>,
    pub qualified: bool,
    pub summary: String,
}

#[derive(Debug, Clone, Default)]
pub struct LeadScorer {
    scoring: ScoringConfig,
    weights: Weights,
}

impl LeadScorer {
    pub fn new(scoring: ScoringConfig, weights: Weights) -> Self {
        Self { scoring, weights }
    }

    pub fn qualification_score(&self) -> u32 {
        self.scoring.qualification_score
    }

    /// Sum the weight of every triggered condition.
    ///
    /// Issues are recorded in rubric order, which is also the tie-break order
    /// used by [`LeadScorer::top_issues`].
    pub fn calculate_score(&self, audit: &SiteAudit) -> ScoringResult {
        let mut score = 0;
        let mut issues = Vec::new();
        let SiteAudit {
            seo,
            ux,
            performance,
            ..
        } = audit;

        if performance.score < self.scoring.performance_threshold {
            score += self.weights.low_performance;
            issues.push(Issue {
                kind: IssueKind::LowPerformance,
                severity: Severity::High,
                message: format!("Performance score: {}/100", performance.score),
                load_time: Some(performance.load_time),
                details: Vec::new(),
            });
        }

        if seo.score < self.scoring.seo_threshold {
            score += self.weights.low_seo;
            issues.push(Issue {
                kind: IssueKind::LowSeo,
                severity: Severity::Medium,
                message: format!("SEO score: {}/100", seo.score),
                load_time: None,
                details: seo.issues.clone(),
            });
        }

        if seo.missing_meta_description() {
            score += self.weights.no_meta_description;
            issues.push(Issue {
                kind: IssueKind::NoMetaDescription,
                severity: Severity::Medium,
                message: "Missing meta descriptions hurt search visibility".to_string(),
                load_time: None,
                details: Vec::new(),
            });
        }

        if seo.h1_problem() {
            score += self.weights.missing_h1;
            issues.push(Issue {
                kind: IssueKind::MissingH1,
                severity: Severity::Medium,
                message: "Poor heading structure affects SEO".to_string(),
                load_time: None,
                details: Vec::new(),
            });
        }

        if !ux.details.has_cta {
            score += self.weights.no_cta;
            issues.push(Issue {
                kind: IssueKind::NoCta,
                severity: Severity::High,
                message: "No clear call-to-action above the fold".to_string(),
                load_time: None,
                details: Vec::new(),
            });
        }

        if !ux.details.has_contact_form && !ux.details.has_contact_link {
            score += self.weights.no_contact_form;
            issues.push(Issue {
                kind: IssueKind::NoContactForm,
                severity: Severity::High,
                message: "No easy way for customers to contact you".to_string(),
                load_time: None,
                details: Vec::new(),
            });
        }

        if performance.load_time > self.scoring.slow_load_secs {
            score += self.weights.slow_load_time;
            issues.push(Issue {
                kind: IssueKind::SlowLoadTime,
                severity: Severity::High,
                message: format!(
                    "Slow load time ({:.2}s) drives visitors away",
                    performance.load_time
                ),
                load_time: Some(performance.load_time),
                details: Vec::new(),
            });
        }

        ScoringResult {
            score,
            qualified: score >= self.scoring.qualification_score,
            summary: summarize(score).to_string(),
            issues,
        }
    }

    /// The `limit` most severe issues rendered for outreach. Equal
    /// severities keep their rubric order.
    pub fn top_issues(&self, result: &ScoringResult, limit: usize) -> Vec<String> {
        let mut ranked: Vec<&Issue> = result.issues.iter().collect();
        ranked.sort_by(|a, b| b.severity.cmp(&a.severity));
        ranked
            .into_iter()
            .take(limit)
            .map(describe_issue)
            .collect()
    }

    /// Fallback score for an audited site that never became a lead.
    pub fn baseline_score(&self, audit: &SiteAudit) -> u32 {
        let mut score = 0;
        if audit.performance.score < self.scoring.performance_threshold {
            score += self.weights.low_performance;
        }
        if audit.seo.score < self.scoring.seo_threshold {
            score += self.weights.low_seo;
        }
        if audit.ux.score < self.scoring.ux_threshold {
            score += self.weights.low_ux;
        }
        score
    }
}

pub fn summarize(score: u32) -> &'static str {
    if score < 5 {
        "Low priority - minor improvements needed"
    } else if score < 10 {
        "Medium priority - significant improvement potential"
    } else {
        "High priority - major issues affecting conversions"
    }
}

/// Business-language description of an issue, free of technical jargon.
pub fn describe_issue(issue: &Issue) -> String {
    match issue.kind {
        IssueKind::LowPerformance | IssueKind::SlowLoadTime => {
            let load_time = issue
                .load_time
                .filter(|t| *t > 0.0)
                .map(|t| format!("{:.2}", t))
                .unwrap_or_else(|| "5+".to_string());
            format!(
                "Your site takes {}s to load on mobile - most visitors leave after 3 seconds",
                load_time
            )
        }
        IssueKind::LowSeo => {
            "SEO gaps are making it harder for customers to find you on Google".to_string()
        }
        IssueKind::NoCta => {
            "No clear call-to-action above the fold - visitors don't know what to do next"
                .to_string()
        }
        IssueKind::NoContactForm => {
            "Missing contact form makes it hard for customers to reach you".to_string()
        }
        IssueKind::NoMetaDescription => {
            "Missing meta descriptions hurt your Google search appearance".to_string()
        }
        IssueKind::MissingH1 => {
            "Poor page structure makes it harder for search engines to understand your content"
                .to_string()
        }
    }
}

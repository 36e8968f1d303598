// Tests for the lead scoring rubric

use leadscout_core::config::{ScoringConfig, Weights};
use leadscout_core::model::{IssueKind, Severity};
use leadscout_core::scoring::{LeadScorer, describe_issue, summarize};
use leadscout_scanner::SiteAudit;
use leadscout_scanner::result::{
    Contacts, PerformanceAudit, SeoAudit, SeoDetails, UxAudit, UxDetails,
};

const GOOD_DESCRIPTION: &str =
    "A description that is comfortably longer than fifty characters in total.";

fn healthy_audit() -> SiteAudit {
    SiteAudit {
        url: "https://healthy.com/".to_string(),
        seo: SeoAudit {
            score: 100,
            issues: vec![],
            details: SeoDetails {
                title: "Healthy business home".to_string(),
                meta_description: Some(GOOD_DESCRIPTION.to_string()),
                h1_count: 1,
                images_without_alt: 0,
            },
        },
        ux: UxAudit {
            score: 100,
            issues: vec![],
            details: UxDetails {
                has_cta: true,
                cta_count: 2,
                has_contact_form: true,
                has_contact_link: true,
                has_social_proof: true,
            },
        },
        performance: PerformanceAudit {
            score: 100,
            load_time: 0.4,
            issues: vec![],
        },
        contacts: Contacts::default(),
    }
}

fn broken_audit() -> SiteAudit {
    let mut audit = healthy_audit();
    audit.performance.score = 50;
    audit.performance.load_time = 4.0;
    audit.seo.score = 60;
    audit.seo.issues = vec![
        "Missing or too short meta description".to_string(),
        "No H1 tag found".to_string(),
    ];
    audit.seo.details.meta_description = None;
    audit.seo.details.h1_count = 0;
    audit.ux.details = UxDetails::default();
    audit
}

// ============================================================================
// Score Calculation Tests
// ============================================================================

#[test]
fn test_every_condition_triggered() {
    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&broken_audit());

    // 3 + 2 + 2 + 2 + 3 + 2 + 3
    assert_eq!(result.score, 17);
    assert!(result.qualified);
    assert_eq!(result.issues.len(), 7);
    assert_eq!(
        result.summary,
        "High priority - major issues affecting conversions"
    );
}

#[test]
fn test_issue_order_follows_rubric() {
    let scorer = LeadScorer::default();
    let kinds: Vec<IssueKind> = scorer
        .calculate_score(&broken_audit())
        .issues
        .iter()
        .map(|i| i.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            IssueKind::LowPerformance,
            IssueKind::LowSeo,
            IssueKind::NoMetaDescription,
            IssueKind::MissingH1,
            IssueKind::NoCta,
            IssueKind::NoContactForm,
            IssueKind::SlowLoadTime,
        ]
    );
}

#[test]
fn test_healthy_site_scores_zero() {
    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&healthy_audit());

    assert_eq!(result.score, 0);
    assert!(!result.qualified);
    assert!(result.issues.is_empty());
    assert_eq!(result.summary, "Low priority - minor improvements needed");
}

#[test]
fn test_contact_link_alone_is_enough() {
    let mut audit = healthy_audit();
    audit.ux.details.has_contact_form = false;
    audit.ux.details.has_contact_link = true;

    let result = LeadScorer::default().calculate_score(&audit);
    assert!(!result.issues.iter().any(|i| i.kind == IssueKind::NoContactForm));
}

#[test]
fn test_multiple_h1_counts_as_heading_problem() {
    let mut audit = healthy_audit();
    audit.seo.details.h1_count = 3;

    let result = LeadScorer::default().calculate_score(&audit);
    assert_eq!(result.score, 2);
    assert_eq!(result.issues[0].kind, IssueKind::MissingH1);
}

#[test]
fn test_qualification_threshold_boundary() {
    // no CTA (3) + no contact (2) + missing H1 (2) = 7
    let mut audit = healthy_audit();
    audit.ux.details = UxDetails::default();
    audit.seo.details.h1_count = 0;

    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&audit);
    assert_eq!(result.score, 7);
    assert!(result.qualified);
    assert_eq!(
        result.summary,
        "Medium priority - significant improvement potential"
    );

    let strict = LeadScorer::new(
        ScoringConfig {
            qualification_score: 8,
            ..ScoringConfig::default()
        },
        Weights::default(),
    );
    assert!(!strict.calculate_score(&audit).qualified);
}

#[test]
fn test_custom_weights() {
    let scorer = LeadScorer::new(
        ScoringConfig::default(),
        Weights {
            no_cta: 10,
            ..Weights::default()
        },
    );
    let mut audit = healthy_audit();
    audit.ux.details.has_cta = false;

    assert_eq!(scorer.calculate_score(&audit).score, 10);
}

#[test]
fn test_rescoring_is_idempotent() {
    let scorer = LeadScorer::default();
    let audit = broken_audit();

    let first = scorer.calculate_score(&audit);
    let second = scorer.calculate_score(&audit);

    assert_eq!(first, second);
    assert_eq!(scorer.top_issues(&first, 3), scorer.top_issues(&second, 3));
}

// ============================================================================
// Top Issue Tests
// ============================================================================

#[test]
fn test_top_issues_prefers_high_severity() {
    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&broken_audit());
    let top = scorer.top_issues(&result, 3);

    assert_eq!(top.len(), 3);
    // High issues in rubric order: low performance, no CTA, no contact form
    assert_eq!(
        top[0],
        "Your site takes 4.00s to load on mobile - most visitors leave after 3 seconds"
    );
    assert_eq!(
        top[1],
        "No clear call-to-action above the fold - visitors don't know what to do next"
    );
    assert_eq!(
        top[2],
        "Missing contact form makes it hard for customers to reach you"
    );
}

#[test]
fn test_top_issues_medium_fill_in() {
    let mut audit = healthy_audit();
    audit.seo.score = 40;
    audit.seo.details.meta_description = None;
    audit.ux.details.has_cta = false;

    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&audit);
    let top = scorer.top_issues(&result, 3);

    assert_eq!(
        top,
        vec![
            "No clear call-to-action above the fold - visitors don't know what to do next"
                .to_string(),
            "SEO gaps are making it harder for customers to find you on Google".to_string(),
            "Missing meta descriptions hurt your Google search appearance".to_string(),
        ]
    );
}

#[test]
fn test_top_issues_does_not_reorder_result() {
    let scorer = LeadScorer::default();
    let result = scorer.calculate_score(&broken_audit());
    let before = result.issues.clone();
    let _ = scorer.top_issues(&result, 3);
    assert_eq!(result.issues, before);
}

#[test]
fn test_describe_issue_without_load_time() {
    let scorer = LeadScorer::default();
    let mut result = scorer.calculate_score(&broken_audit());
    let mut issue = result.issues.remove(0);
    issue.load_time = None;

    assert_eq!(issue.severity, Severity::High);
    assert!(describe_issue(&issue).contains("takes 5+s to load"));
}

// ============================================================================
// Summary and Baseline Tests
// ============================================================================

#[test]
fn test_summary_bands() {
    assert_eq!(summarize(0), "Low priority - minor improvements needed");
    assert_eq!(summarize(4), "Low priority - minor improvements needed");
    assert_eq!(summarize(5), "Medium priority - significant improvement potential");
    assert_eq!(summarize(9), "Medium priority - significant improvement potential");
    assert_eq!(summarize(10), "High priority - major issues affecting conversions");
}

#[test]
fn test_baseline_score() {
    let scorer = LeadScorer::default();
    let mut audit = healthy_audit();
    assert_eq!(scorer.baseline_score(&audit), 0);

    audit.performance.score = 50;
    audit.seo.score = 69;
    audit.ux.score = 55;
    assert_eq!(scorer.baseline_score(&audit), 7);
}

// Tests for lead export

use leadscout_core::data::{AddOutcome, Database};
use leadscout_core::export::{
    CSV_HEADERS, ExportOutcome, NO_ISSUES_SUMMARY, ReportFormat, compute_stats, export_sites,
    format_display_timestamp, format_iso8601_timestamp, gather_export_rows, generate_csv_report,
    sorted_by_score,
};
use leadscout_core::model::{EmailDraft, Lead, LinkedInDraft, NewSite, OutreachMessage};
use leadscout_core::scoring::LeadScorer;
use leadscout_scanner::SiteAudit;
use leadscout_scanner::result::{
    Contacts, PerformanceAudit, SeoAudit, SeoDetails, UxAudit, UxDetails,
};
use tempfile::TempDir;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("test.db")).unwrap();
    (temp_dir, db)
}

fn audit(performance: u32, seo: u32, ux: u32, emails: &[&str]) -> SiteAudit {
    SiteAudit {
        url: "https://site.com/".to_string(),
        seo: SeoAudit {
            score: seo,
            issues: vec![],
            details: SeoDetails {
                title: "Site".to_string(),
                meta_description: None,
                h1_count: 1,
                images_without_alt: 0,
            },
        },
        ux: UxAudit {
            score: ux,
            issues: vec![],
            details: UxDetails::default(),
        },
        performance: PerformanceAudit {
            score: performance,
            load_time: 2.345,
            issues: vec![],
        },
        contacts: Contacts {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            phones: vec![],
            social_links: vec![],
        },
    }
}

fn add_audited(db: &Database, domain: &str, audit: &SiteAudit) -> String {
    let AddOutcome::Added(site) = db
        .add_site(&NewSite::manual(domain, "Retail", "Denver"))
        .unwrap()
    else {
        panic!("duplicate {}", domain);
    };
    db.save_audit(&site.id, audit).unwrap();
    db.mark_site_audited(&site.id).unwrap();
    site.id
}

fn add_lead(db: &Database, site_id: &str, domain: &str, score: u32, emails: &[&str]) {
    db.save_lead(&Lead {
        site_id: site_id.to_string(),
        domain: domain.to_string(),
        score,
        issues: vec![],
        top_issues: vec!["Slow, very slow".to_string(), "No CTA".to_string()],
        summary: "High priority - major issues affecting conversions".to_string(),
        contacts: Contacts {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            phones: vec!["555-000-1111".to_string()],
            social_links: vec![],
        },
        created_at: 1_700_000_000,
    })
    .unwrap();
    db.save_outreach(&OutreachMessage {
        site_id: site_id.to_string(),
        email: EmailDraft {
            subject: "Quick question".to_string(),
            body: "Hi there,\n\nLine two".to_string(),
        },
        linked_in: LinkedInDraft {
            message: "Hi!".to_string(),
        },
        generated_at: 1_700_000_000,
    })
    .unwrap();
}

// ============================================================================
// Row Gathering Tests
// ============================================================================

#[test]
fn test_gather_only_audited_sites() {
    let (_temp_dir, db) = create_test_db();
    add_audited(&db, "audited.com", &audit(90, 90, 90, &[]));
    db.add_site(&NewSite::manual("pending.com", "", "")).unwrap();

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].domain, "audited.com");
}

#[test]
fn test_row_without_lead_uses_baseline_score() {
    let (_temp_dir, db) = create_test_db();
    add_audited(&db, "fine.com", &audit(50, 90, 60, &["a@fine.com"]));

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let row = &rows[0];

    // performance < 60 (3) + ux < 70 (2)
    assert_eq!(row.lead_score, 5);
    assert_eq!(row.summary, NO_ISSUES_SUMMARY);
    assert!(row.top_issues.is_empty());
    assert_eq!(row.emails, vec!["a@fine.com".to_string()]);
    assert!(row.email_subject.is_empty());
    assert!(row.audited_at.is_some());
}

#[test]
fn test_row_with_lead_uses_lead_data() {
    let (_temp_dir, db) = create_test_db();
    let id = add_audited(&db, "lead.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &id, "lead.com", 12, &["owner@lead.com"]);

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let row = &rows[0];

    assert_eq!(row.lead_score, 12);
    assert_eq!(row.performance_score, 30);
    assert_eq!(row.seo_score, 40);
    assert_eq!(row.ux_score, 50);
    assert_eq!(row.emails, vec!["owner@lead.com".to_string()]);
    assert_eq!(row.email_subject, "Quick question");
    assert_eq!(row.linkedin_message, "Hi!");
}

// ============================================================================
// Stats and Ordering Tests
// ============================================================================

#[test]
fn test_compute_stats() {
    let (_temp_dir, db) = create_test_db();
    let a = add_audited(&db, "a.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &a, "a.com", 12, &["x@a.com"]);
    add_audited(&db, "b.com", &audit(90, 90, 90, &[]));
    let c = add_audited(&db, "c.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &c, "c.com", 9, &[]);

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let stats = compute_stats(&rows, 7);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.qualified, 2);
    assert_eq!(stats.good, 1);
    assert_eq!(stats.with_email, 1);
    assert_eq!(stats.without_email, 2);
    assert!((stats.average_score - 7.0).abs() < f64::EPSILON);
}

#[test]
fn test_compute_stats_empty() {
    let stats = compute_stats(&[], 7);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.average_score, 0.0);
}

#[test]
fn test_sorted_by_score_is_stable() {
    let (_temp_dir, db) = create_test_db();
    add_audited(&db, "first.com", &audit(90, 90, 90, &[]));
    let top = add_audited(&db, "top.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &top, "top.com", 15, &[]);
    add_audited(&db, "second.com", &audit(90, 90, 90, &[]));

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let domains: Vec<&str> = sorted_by_score(&rows)
        .into_iter()
        .map(|r| r.domain.as_str())
        .collect();

    assert_eq!(domains, vec!["top.com", "first.com", "second.com"]);
}

// ============================================================================
// CSV Tests
// ============================================================================

#[test]
fn test_csv_report_layout() {
    let (_temp_dir, db) = create_test_db();
    let id = add_audited(&db, "lead.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &id, "lead.com", 12, &["a@lead.com", "b@lead.com"]);

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let csv = generate_csv_report(&rows).unwrap();
    let header = csv.lines().next().unwrap();

    assert_eq!(header, CSV_HEADERS.join(","));
    assert!(csv.contains("lead.com,Retail,Denver,12,"));
    assert!(csv.contains(",2.35,") || csv.contains(",2.34,"));
    assert!(csv.contains("\"Slow, very slow\",No CTA,,"));
    assert!(csv.contains("a@lead.com; b@lead.com"));
    assert!(csv.contains("\"Hi there,\n\nLine two\""));
    assert!(csv.contains(&format_iso8601_timestamp(rows[0].audited_at.unwrap())));
}

#[test]
fn test_csv_report_reads_back() {
    let (_temp_dir, db) = create_test_db();
    let id = add_audited(&db, "lead.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &id, "lead.com", 12, &["a@lead.com"]);

    let rows = gather_export_rows(&db, &LeadScorer::default()).unwrap();
    let csv = generate_csv_report(&rows).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].len(), CSV_HEADERS.len());

    let field = |name: &str| {
        let idx = CSV_HEADERS.iter().position(|h| *h == name).unwrap();
        records[0].get(idx).unwrap().to_string()
    };
    assert_eq!(field("Domain"), "lead.com");
    assert_eq!(field("Email Body"), rows[0].email_body);
    assert!(rows[0].email_body.contains('\n'));
}

#[test]
fn test_format_iso8601_timestamp() {
    assert_eq!(format_iso8601_timestamp(0), "1970-01-01T00:00:00+00:00");
}

#[test]
fn test_format_display_timestamp() {
    assert_eq!(format_display_timestamp(86_400), "1970-01-02 00:00:00 UTC");
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn test_export_empty_writes_nothing() {
    let (temp_dir, db) = create_test_db();
    db.add_site(&NewSite::manual("pending.com", "", "")).unwrap();
    let path = temp_dir.path().join("out").join("leads.csv");

    let outcome = export_sites(&db, &LeadScorer::default(), &path, ReportFormat::Csv).unwrap();

    assert_eq!(outcome, ExportOutcome::Empty);
    assert!(!path.exists());
}

#[test]
fn test_export_csv_file() {
    let (temp_dir, db) = create_test_db();
    add_audited(&db, "a.com", &audit(90, 90, 90, &[]));
    let path = temp_dir.path().join("out").join("leads.csv");

    let outcome = export_sites(&db, &LeadScorer::default(), &path, ReportFormat::Csv).unwrap();

    let ExportOutcome::Written { rows, stats, .. } = outcome else {
        panic!("expected a written export");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(stats.total, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_export_json_file() {
    let (temp_dir, db) = create_test_db();
    let id = add_audited(&db, "lead.com", &audit(30, 40, 50, &[]));
    add_lead(&db, &id, "lead.com", 12, &[]);
    let path = temp_dir.path().join("leads.json");

    export_sites(&db, &LeadScorer::default(), &path, ReportFormat::Json).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["report"]["metadata"]["generator"], "leadscout");
    assert_eq!(parsed["report"]["summary"]["qualified"], 1);
    assert_eq!(parsed["report"]["sites"][0]["domain"], "lead.com");
    assert_eq!(parsed["report"]["sites"][0]["lead_score"], 12);
}

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("CSV"), Some(ReportFormat::Csv));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("xml"), None);
}

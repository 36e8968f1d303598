// Tests for outreach message generation

use leadscout_core::model::{Site, SiteStatus};
use leadscout_core::outreach::{
    OutreachGenerator, extract_business_name, generate_email_body, generate_linkedin_message,
    generate_subject, guess_name_from_email,
};
use leadscout_scanner::result::Contacts;

fn test_site(domain: &str) -> Site {
    Site {
        id: "site-1".to_string(),
        domain: domain.to_string(),
        category: "Legal".to_string(),
        location: "Chicago".to_string(),
        source: "manual".to_string(),
        status: SiteStatus::Pending,
        added_at: 0,
        last_audit_at: None,
        error: None,
    }
}

// ============================================================================
// Business Name Tests
// ============================================================================

#[test]
fn test_extract_business_name_simple() {
    assert_eq!(extract_business_name("lawfirm.com"), "Lawfirm");
}

#[test]
fn test_extract_business_name_hyphenated() {
    assert_eq!(extract_business_name("joes-pizza.net"), "Joes Pizza");
    assert_eq!(extract_business_name("fitness_gym.io"), "Fitness Gym");
}

#[test]
fn test_extract_business_name_strips_scheme_and_www() {
    assert_eq!(extract_business_name("https://www.dentist-site.com"), "Dentist Site");
    assert_eq!(extract_business_name("http://acme.dev"), "Acme");
}

#[test]
fn test_extract_business_name_keeps_unknown_tld() {
    assert_eq!(extract_business_name("bakery.co.uk"), "Bakery.co.uk");
}

// ============================================================================
// Name Guessing Tests
// ============================================================================

#[test]
fn test_guess_name_dotted() {
    assert_eq!(guess_name_from_email("jane.doe@firm.com"), "Jane");
}

#[test]
fn test_guess_name_underscored() {
    assert_eq!(guess_name_from_email("bob_smith@firm.com"), "Bob");
}

#[test]
fn test_guess_name_generic_mailbox() {
    for mailbox in ["info", "contact", "hello", "support", "admin", "INFO"] {
        assert_eq!(guess_name_from_email(&format!("{}@firm.com", mailbox)), "there");
    }
}

#[test]
fn test_guess_name_plain() {
    assert_eq!(guess_name_from_email("maria@firm.com"), "Maria");
}

// ============================================================================
// Template Tests
// ============================================================================

#[test]
fn test_subject_is_deterministic() {
    let first = generate_subject("Lawfirm", "lawfirm.com");
    let second = generate_subject("Lawfirm", "lawfirm.com");
    assert_eq!(first, second);
    assert!(first.contains("Lawfirm") || first.contains("lawfirm.com"));
}

#[test]
fn test_email_body_numbers_issues() {
    let issues = vec!["First problem".to_string(), "Second problem".to_string()];
    let body = generate_email_body("Jane", "lawfirm.com", &issues);

    assert!(body.starts_with("Hi Jane,"));
    assert!(body.contains("I was checking out lawfirm.com"));
    assert!(body.contains("1. First problem\n2. Second problem"));
    assert!(body.ends_with("[Your Company]"));
}

#[test]
fn test_linkedin_message_lowercases_issue() {
    let issue = "No clear call-to-action above the fold".to_string();
    let message = generate_linkedin_message("lawfirm.com", Some(&issue));
    assert!(message.contains("noticed no clear call-to-action above the fold."));
}

#[test]
fn test_linkedin_message_without_issue() {
    let message = generate_linkedin_message("lawfirm.com", None);
    assert!(message.contains("reviewing lawfirm.com"));
}

#[test]
fn test_generate_message() {
    let generator = OutreachGenerator::new();
    let site = test_site("lawfirm.com");
    let contacts = Contacts {
        emails: vec!["jane.doe@lawfirm.com".to_string()],
        phones: vec![],
        social_links: vec![],
    };
    let issues = vec!["Slow page".to_string()];

    let message = generator.generate_message(&site, &issues, &contacts);

    assert_eq!(message.site_id, "site-1");
    assert!(message.email.body.starts_with("Hi Jane,"));
    assert!(message.email.body.contains("1. Slow page"));
    assert!(message.linked_in.message.contains("noticed slow page."));
    assert!(message.generated_at > 0);
}

#[test]
fn test_generate_message_without_email() {
    let generator = OutreachGenerator::new();
    let message = generator.generate_message(
        &test_site("lawfirm.com"),
        &["Slow page".to_string()],
        &Contacts::default(),
    );
    assert!(message.email.body.starts_with("Hi there,"));
}

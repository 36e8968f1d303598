// Outreach message templates

use crate::data::current_timestamp;
use crate::model::{EmailDraft, LinkedInDraft, OutreachMessage, Site};
use leadscout_scanner::result::Contacts;

const STRIPPED_TLDS: [&str; 7] = [".com", ".net", ".org", ".io", ".co", ".ai", ".dev"];
const GENERIC_MAILBOXES: [&str; 5] = ["info", "contact", "hello", "support", "admin"];

#[derive(Debug, Clone, Default)]
pub struct OutreachGenerator;

impl OutreachGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_message(
        &self,
        site: &Site,
        top_issues: &[String],
        contacts: &Contacts,
    ) -> OutreachMessage {
        let business_name = extract_business_name(&site.domain);
        let greeting = contacts
            .emails
            .first()
            .map(|email| guess_name_from_email(email))
            .unwrap_or_else(|| "there".to_string());

        OutreachMessage {
            site_id: site.id.clone(),
            email: EmailDraft {
                subject: generate_subject(&business_name, &site.domain),
                body: generate_email_body(&greeting, &site.domain, top_issues),
            },
            linked_in: LinkedInDraft {
                message: generate_linkedin_message(&site.domain, top_issues.first()),
            },
            generated_at: current_timestamp(),
        }
    }
}

/// Pick one of the subject lines. The choice depends only on the domain, so
/// regenerating a message for the same site gives the same subject.
pub fn generate_subject(business_name: &str, domain: &str) -> String {
    let templates = [
        format!("Quick question about {}'s website", business_name),
        format!("{} - website performance insight", business_name),
        format!("Noticed something about {}", domain),
        format!("{}'s website could be performing better", business_name),
    ];

    let pick = domain
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
        % templates.len();
    templates[pick].clone()
}

pub fn generate_email_body(greeting: &str, domain: &str, top_issues: &[String]) -> String {
    let issues_text = top_issues
        .iter()
        .enumerate()
        .map(|(idx, issue)| format!("{}. {}", idx + 1, issue))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Hi {greeting},

I was checking out {domain} and noticed a few things that might be costing you conversions:

{issues_text}

These are quick wins that could improve your user experience and revenue.

Would you be open to a free 15-minute audit call? I can walk you through specific fixes and share a detailed report.

Best regards,
[Your Name]
[Your Company]"
    )
}

pub fn generate_linkedin_message(domain: &str, top_issue: Option<&String>) -> String {
    let observation = top_issue
        .map(|issue| issue.to_lowercase())
        .unwrap_or_else(|| "a few things worth a closer look".to_string());
    format!(
        "Hi! I was reviewing {} and noticed {}. Would you be open to a quick chat about improving your site's performance?",
        domain, observation
    )
}

/// "https://www.joes-pizza.com" -> "Joes Pizza"
pub fn extract_business_name(domain: &str) -> String {
    let mut name = domain.trim();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
            break;
        }
    }
    name = name.strip_prefix("www.").unwrap_or(name);
    for tld in STRIPPED_TLDS {
        if let Some(rest) = name.strip_suffix(tld) {
            name = rest;
            break;
        }
    }

    name.replace(['-', '_'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First name guess from a mailbox; generic mailboxes get "there".
pub fn guess_name_from_email(email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or_default();

    for separator in ['.', '_'] {
        if local_part.contains(separator) {
            let first = local_part.split(separator).next().unwrap_or_default();
            return capitalize(first);
        }
    }

    if local_part.is_empty() || GENERIC_MAILBOXES.contains(&local_part.to_lowercase().as_str()) {
        return "there".to_string();
    }

    capitalize(local_part)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

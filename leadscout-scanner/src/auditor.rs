use crate::error::{Result, ScanError};
use crate::result::{
    Contacts, FetchedPage, PerformanceAudit, SeoAudit, SeoDetails, SiteAudit, UxAudit, UxDetails,
    round_hundredths,
};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const MIN_TITLE_LEN: usize = 10;
pub const MIN_META_DESCRIPTION_LEN: usize = 50;
pub const SLOW_LOAD_SECS: f64 = 3.0;

const SITEMAP_REMINDER: &str = "Remember to check sitemap.xml and robots.txt manually";
const SOCIAL_PROOF_WORDS: [&str; 3] = ["review", "testimonial", "customer"];
const SOCIAL_DOMAINS: [&str; 4] = ["facebook.com", "twitter.com", "linkedin.com", "instagram.com"];
const MAX_PHONES: usize = 3;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static IMG_WITHOUT_ALT: LazyLock<Selector> = LazyLock::new(|| selector("img:not([alt])"));
static CTA: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"button, [role="button"], a.cta, a.btn, .button"#));
static FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static CONTACT_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[href*="contact"], a[href^="mailto:"]"#));
static MAILTO: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href^="mailto:"]"#));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("email pattern")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern")
});

/// Turn a user-supplied domain into a fetchable URL.
///
/// Trims and lowercases the input; anything not already starting with
/// `http` gets an `https://` prefix.
pub fn normalize_domain(domain: &str) -> String {
    let url = domain.trim().to_lowercase();
    if url.starts_with("http") {
        url
    } else {
        format!("https://{}", url)
    }
}

pub struct Auditor {
    client: Client,
    timeout_secs: u64,
}

impl Auditor {
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_MAX_REDIRECTS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::with_settings(timeout_secs, DEFAULT_USER_AGENT, DEFAULT_MAX_REDIRECTS)
    }

    pub fn with_settings(timeout_secs: u64, user_agent: &str, max_redirects: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// One timed GET. Statuses outside 200..400 count as unreachable.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        if !(200..400).contains(&status_code) {
            warn!("{} answered with status {}", url, status_code);
            return Err(ScanError::Unreachable {
                url: url.to_string(),
                status: status_code,
            });
        }

        let body = response.text().await?;
        let load_time = start.elapsed();
        debug!("Fetched {} ({} bytes) in {:?}", final_url, body.len(), load_time);

        Ok(FetchedPage {
            requested_url: url.to_string(),
            url: final_url,
            status_code,
            body,
            load_time,
        })
    }

    pub async fn run_full_audit(&self, domain: &str) -> Result<SiteAudit> {
        let url = normalize_domain(domain);
        info!("Auditing {}", url);

        let page = self.fetch_page(&url).await?;
        let document = Html::parse_document(&page.body);

        let audit = SiteAudit {
            url: page.url.clone(),
            seo: audit_seo_document(&document),
            ux: audit_ux_document(&document),
            performance: performance_from_load_time(page.load_time_secs()),
            contacts: extract_contacts_document(&document),
        };

        info!(
            "Audited {}: seo {} ux {} performance {}",
            audit.url, audit.seo.score, audit.ux.score, audit.performance.score
        );
        Ok(audit)
    }
}

pub fn audit_seo(html: &str) -> SeoAudit {
    audit_seo_document(&Html::parse_document(html))
}

fn audit_seo_document(document: &Html) -> SeoAudit {
    let mut issues = Vec::new();
    let mut score: i32 = 100;

    let title: String = document
        .select(&TITLE)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string();
    if title.chars().count() < MIN_TITLE_LEN {
        issues.push("Missing or too short <title> tag".to_string());
        score -= 15;
    }

    let meta_description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.to_string());
    let description_ok = meta_description
        .as_ref()
        .is_some_and(|d| d.chars().count() >= MIN_META_DESCRIPTION_LEN);
    if !description_ok {
        issues.push("Missing or too short meta description".to_string());
        score -= 15;
    }

    let h1_count = document.select(&H1).count();
    if h1_count == 0 {
        issues.push("No H1 tag found".to_string());
        score -= 20;
    } else if h1_count > 1 {
        issues.push("Multiple H1 tags found".to_string());
        score -= 10;
    }

    let images_without_alt = document.select(&IMG_WITHOUT_ALT).count();
    if images_without_alt > 0 {
        issues.push(format!("{} images missing alt attributes", images_without_alt));
        score -= (images_without_alt as i32 * 5).min(20);
    }

    issues.push(SITEMAP_REMINDER.to_string());

    SeoAudit {
        score: score.max(0) as u32,
        issues,
        details: SeoDetails {
            title,
            meta_description,
            h1_count,
            images_without_alt,
        },
    }
}

pub fn audit_ux(html: &str) -> UxAudit {
    audit_ux_document(&Html::parse_document(html))
}

fn audit_ux_document(document: &Html) -> UxAudit {
    let mut issues = Vec::new();
    let mut score: i32 = 100;

    let cta_count = document.select(&CTA).count();
    let has_cta = cta_count > 0;
    if !has_cta {
        issues.push("No clear call-to-action buttons found".to_string());
        score -= 30;
    }

    let has_contact_form = document.select(&FORM).next().is_some();
    let has_contact_link = document.select(&CONTACT_LINK).next().is_some();
    if !has_contact_form && !has_contact_link {
        issues.push("No contact form or contact method found".to_string());
        score -= 25;
    }

    let text = document_text(document);
    let has_social_proof = SOCIAL_PROOF_WORDS.iter().any(|word| text.contains(word));
    if !has_social_proof {
        issues.push("No visible social proof or testimonials".to_string());
        score -= 15;
    }

    UxAudit {
        score: score.max(0) as u32,
        issues,
        details: UxDetails {
            has_cta,
            cta_count,
            has_contact_form,
            has_contact_link,
            has_social_proof,
        },
    }
}

/// Map a measured load time onto the 0-100 performance scale. Buckets use
/// the raw measurement; the stored load time is rounded to hundredths.
pub fn performance_from_load_time(load_time_secs: f64) -> PerformanceAudit {
    let score = if load_time_secs > 5.0 {
        30
    } else if load_time_secs > SLOW_LOAD_SECS {
        50
    } else if load_time_secs > 2.0 {
        70
    } else if load_time_secs > 1.0 {
        90
    } else {
        100
    };

    let load_time = round_hundredths(load_time_secs);
    let issues = if load_time_secs > SLOW_LOAD_SECS {
        vec![format!("Slow load time: {:.2}s", load_time)]
    } else {
        Vec::new()
    };

    PerformanceAudit {
        score,
        load_time,
        issues,
    }
}

pub fn extract_contacts(html: &str) -> Contacts {
    extract_contacts_document(&Html::parse_document(html))
}

fn extract_contacts_document(document: &Html) -> Contacts {
    let mut contacts = Contacts::default();

    for element in document.select(&MAILTO) {
        if let Some(href) = element.value().attr("href") {
            let address = href.trim_start_matches("mailto:");
            let email = address.split('?').next().unwrap_or_default().trim();
            push_unique(&mut contacts.emails, email);
        }
    }

    let body_text = document
        .select(&BODY)
        .next()
        .map(|body| body.text().collect::<String>())
        .unwrap_or_else(|| document_text(document));

    for found in EMAIL_RE.find_iter(&body_text) {
        let email = found.as_str();
        if !email.contains("example.com") {
            push_unique(&mut contacts.emails, email);
        }
    }

    for found in PHONE_RE.find_iter(&body_text) {
        if contacts.phones.len() >= MAX_PHONES {
            break;
        }
        push_unique(&mut contacts.phones, found.as_str());
    }

    for element in document.select(&LINK) {
        if let Some(href) = element.value().attr("href")
            && SOCIAL_DOMAINS.iter().any(|domain| href.contains(domain))
        {
            push_unique(&mut contacts.social_links, href);
        }
    }

    contacts
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn document_text(document: &Html) -> String {
    document.root_element().text().collect()
}

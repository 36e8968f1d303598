use crate::error::{CoreError, Result};
use crate::model::{
    AuditRecord, EmailDraft, Lead, LinkedInDraft, NewSite, OutreachMessage, QualifiedLead, Site,
    SiteStatus,
};
use leadscout_scanner::SiteAudit;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct Database {
    conn: Connection,
}

/// Outcome of adding a site; duplicates are reported, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Site),
    Duplicate,
}

impl AddOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            AddOutcome::Added(_) => "Site added successfully",
            AddOutcome::Duplicate => "Site already exists",
        }
    }
}

pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

const SITE_COLUMNS: &str =
    "id, domain, category, location, source, status, added_at, last_audit_at, error";

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    let status: String = row.get(5)?;
    let status = SiteStatus::from_str(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("unknown site status {:?}", status).into(),
        )
    })?;

    Ok(Site {
        id: row.get(0)?,
        domain: row.get(1)?,
        category: row.get(2)?,
        location: row.get(3)?,
        source: row.get(4)?,
        status,
        added_at: row.get(6)?,
        last_audit_at: row.get(7)?,
        error: row.get(8)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<AuditRecord> {
    Ok(AuditRecord {
        site_id: row.get(0)?,
        audit: json_column(row, 1)?,
        audited_at: row.get(2)?,
    })
}

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        site_id: row.get(0)?,
        domain: row.get(1)?,
        score: row.get(2)?,
        summary: row.get(3)?,
        issues: json_column(row, 4)?,
        top_issues: json_column(row, 5)?,
        contacts: json_column(row, 6)?,
        created_at: row.get(7)?,
    })
}

fn outreach_from_row(row: &Row<'_>) -> rusqlite::Result<OutreachMessage> {
    Ok(OutreachMessage {
        site_id: row.get(0)?,
        email: EmailDraft {
            subject: row.get(1)?,
            body: row.get(2)?,
        },
        linked_in: LinkedInDraft {
            message: row.get(3)?,
        },
        generated_at: row.get(4)?,
    })
}

impl Database {
    pub fn drop(path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        debug!("Opened database at {}", path.display());
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Sites to audit; never deleted
            CREATE TABLE IF NOT EXISTS sites (
                id TEXT PRIMARY KEY,
                domain TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                location TEXT NOT NULL DEFAULT '',
                source TEXT NOT NULL,
                status TEXT NOT NULL CHECK(status IN ('pending', 'validated', 'audited', 'failed', 'error')),
                added_at INTEGER NOT NULL,
                last_audit_at INTEGER,
                error TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_sites_status ON sites(status);

            -- One audit per site, replaced on re-audit
            CREATE TABLE IF NOT EXISTS audits (
                site_id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                seo_score INTEGER NOT NULL,
                ux_score INTEGER NOT NULL,
                performance_score INTEGER NOT NULL,
                load_time REAL NOT NULL,
                data TEXT NOT NULL,          -- JSON SiteAudit
                audited_at INTEGER NOT NULL
            );

            -- Qualified sites, superseded on re-scoring
            CREATE TABLE IF NOT EXISTS leads (
                site_id TEXT PRIMARY KEY,
                domain TEXT NOT NULL,
                score INTEGER NOT NULL,
                summary TEXT NOT NULL,
                issues TEXT NOT NULL,        -- JSON array of issues
                top_issues TEXT NOT NULL,    -- JSON array of strings
                contacts TEXT NOT NULL,      -- JSON contacts object
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_leads_score ON leads(score);

            -- Outreach drafts, one per lead
            CREATE TABLE IF NOT EXISTS outreach (
                site_id TEXT PRIMARY KEY,
                email_subject TEXT NOT NULL,
                email_body TEXT NOT NULL,
                linkedin_message TEXT NOT NULL,
                generated_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // Site management
    pub fn add_site(&self, site: &NewSite) -> Result<AddOutcome> {
        if self.get_site_by_domain(&site.domain)?.is_some() {
            debug!("Skipping duplicate site {}", site.domain);
            return Ok(AddOutcome::Duplicate);
        }

        let added = Site {
            id: uuid::Uuid::new_v4().to_string(),
            domain: site.domain.clone(),
            category: site.category.clone(),
            location: site.location.clone(),
            source: site.source.clone(),
            status: SiteStatus::Pending,
            added_at: current_timestamp(),
            last_audit_at: None,
            error: None,
        };

        self.conn.execute(
            "INSERT INTO sites (id, domain, category, location, source, status, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &added.id,
                &added.domain,
                &added.category,
                &added.location,
                &added.source,
                added.status.as_str(),
                added.added_at,
            ],
        )?;

        Ok(AddOutcome::Added(added))
    }

    pub fn get_sites(&self) -> Result<Vec<Site>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM sites ORDER BY added_at, rowid", SITE_COLUMNS))?;

        let sites = stmt
            .query_map([], site_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sites)
    }

    pub fn get_site(&self, id: &str) -> Result<Option<Site>> {
        let site = self
            .conn
            .query_row(
                &format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS),
                params![id],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    pub fn get_site_by_domain(&self, domain: &str) -> Result<Option<Site>> {
        let site = self
            .conn
            .query_row(
                &format!("SELECT {} FROM sites WHERE domain = ?1", SITE_COLUMNS),
                params![domain],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    /// Sites whose status is pending or validated.
    pub fn get_sites_to_audit(&self) -> Result<Vec<Site>> {
        Ok(self
            .get_sites()?
            .into_iter()
            .filter(|s| s.status.is_auditable())
            .collect())
    }

    pub fn update_site_status(
        &self,
        id: &str,
        status: SiteStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE sites SET status = ?1, error = ?2 WHERE id = ?3",
            params![status.as_str(), error, id],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound(format!("site {}", id)));
        }
        Ok(())
    }

    pub fn mark_site_audited(&self, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE sites SET status = ?1, last_audit_at = ?2, error = NULL WHERE id = ?3",
            params![SiteStatus::Audited.as_str(), current_timestamp(), id],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound(format!("site {}", id)));
        }
        Ok(())
    }

    pub fn count_sites_by_status(&self) -> Result<Vec<(SiteStatus, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM sites GROUP BY status ORDER BY status")?;

        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(counts
            .into_iter()
            .filter_map(|(status, count)| SiteStatus::from_str(&status).map(|s| (s, count)))
            .collect())
    }

    // Audit operations
    pub fn save_audit(&self, site_id: &str, audit: &SiteAudit) -> Result<AuditRecord> {
        let record = AuditRecord {
            site_id: site_id.to_string(),
            audit: audit.clone(),
            audited_at: current_timestamp(),
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO audits (
                site_id, url, seo_score, ux_score, performance_score, load_time, data, audited_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                site_id,
                &audit.url,
                audit.seo.score,
                audit.ux.score,
                audit.performance.score,
                audit.performance.load_time,
                to_json(audit)?,
                record.audited_at,
            ],
        )?;

        Ok(record)
    }

    pub fn get_audit(&self, site_id: &str) -> Result<Option<AuditRecord>> {
        let audit = self
            .conn
            .query_row(
                "SELECT site_id, data, audited_at FROM audits WHERE site_id = ?1",
                params![site_id],
                audit_from_row,
            )
            .optional()?;
        Ok(audit)
    }

    pub fn get_audits(&self) -> Result<Vec<AuditRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT site_id, data, audited_at FROM audits ORDER BY rowid")?;

        let audits = stmt
            .query_map([], audit_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(audits)
    }

    // Lead operations
    pub fn save_lead(&self, lead: &Lead) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO leads (
                site_id, domain, score, summary, issues, top_issues, contacts, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &lead.site_id,
                &lead.domain,
                lead.score,
                &lead.summary,
                to_json(&lead.issues)?,
                to_json(&lead.top_issues)?,
                to_json(&lead.contacts)?,
                lead.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_lead(&self, site_id: &str) -> Result<Option<Lead>> {
        let lead = self
            .conn
            .query_row(
                "SELECT site_id, domain, score, summary, issues, top_issues, contacts, created_at
                 FROM leads WHERE site_id = ?1",
                params![site_id],
                lead_from_row,
            )
            .optional()?;
        Ok(lead)
    }

    pub fn get_leads(&self) -> Result<Vec<Lead>> {
        let mut stmt = self.conn.prepare(
            "SELECT site_id, domain, score, summary, issues, top_issues, contacts, created_at
             FROM leads ORDER BY rowid",
        )?;

        let leads = stmt
            .query_map([], lead_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    /// Drop a site's lead together with its outreach draft.
    pub fn remove_lead(&self, site_id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM leads WHERE site_id = ?1", params![site_id])?;
        self.conn
            .execute("DELETE FROM outreach WHERE site_id = ?1", params![site_id])?;
        Ok(removed > 0)
    }

    // Outreach operations
    pub fn save_outreach(&self, message: &OutreachMessage) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO outreach (
                site_id, email_subject, email_body, linkedin_message, generated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &message.site_id,
                &message.email.subject,
                &message.email.body,
                &message.linked_in.message,
                message.generated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_outreach(&self, site_id: &str) -> Result<Option<OutreachMessage>> {
        let message = self
            .conn
            .query_row(
                "SELECT site_id, email_subject, email_body, linkedin_message, generated_at
                 FROM outreach WHERE site_id = ?1",
                params![site_id],
                outreach_from_row,
            )
            .optional()?;
        Ok(message)
    }

    /// Leads at or above `min_score`, joined with their site, audit and outreach draft.
    pub fn get_qualified_leads(&self, min_score: u32) -> Result<Vec<QualifiedLead>> {
        self.get_leads()?
            .into_iter()
            .filter(|lead| lead.score >= min_score)
            .map(|lead| {
                Ok(QualifiedLead {
                    site: self.get_site(&lead.site_id)?,
                    audit: self.get_audit(&lead.site_id)?,
                    message: self.get_outreach(&lead.site_id)?,
                    lead,
                })
            })
            .collect()
    }
}

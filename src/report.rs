// src/report.rs
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
}

/// One logged unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// External message id of the originating submission, or a generated
    /// id when the submission carried none.
    pub id: String,
    pub username: String,
    /// May differ from `username` when someone reports on a colleague's
    /// behalf.
    pub reporter: String,
    pub job: String,
    pub hours: Decimal,
    /// Business timestamp the work is attributed to.
    pub reported_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_edit_at: Option<DateTime<Utc>>,
    pub last_update_at: Option<DateTime<Utc>>,
    pub attachments: Vec<Attachment>,
    pub link: Option<String>,
    pub secret: bool,
    pub paid_time_off: bool,
}

/// One report submission, before identity resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDraft {
    pub message_id: Option<String>,
    pub username: String,
    pub reporter: String,
    pub job: String,
    pub hours: Decimal,
    pub reported_at: DateTime<Utc>,
    pub last_edit_at: Option<DateTime<Utc>>,
    pub attachments: Vec<Attachment>,
    pub link: Option<String>,
    pub secret: bool,
    pub paid_time_off: bool,
}

/// In-memory report collection holding at most one report per external
/// identifier. Resubmission with a known id updates the mutable fields in
/// place; reports are never deleted.
#[derive(Debug, Default, Clone)]
pub struct ReportBook {
    reports: HashMap<String, Report>,
}

impl ReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates a report, keyed by the submission's message id.
    /// A submission without one gets a generated id and always creates.
    pub fn upsert(&mut self, draft: ReportDraft, now: DateTime<Utc>) -> &Report {
        let id = draft
            .message_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.reports.entry(id.clone()) {
            Entry::Occupied(entry) => {
                let report = entry.into_mut();
                debug!("Updating report {} for {}", id, report.username);
                report.reporter = draft.reporter;
                report.job = draft.job;
                report.hours = draft.hours;
                report.last_edit_at = Some(draft.last_edit_at.unwrap_or(now));
                report.last_update_at = Some(now);
                report.attachments = draft.attachments;
                report.link = draft.link;
                report
            }
            Entry::Vacant(entry) => {
                debug!("Creating report {} for {}", id, draft.username);
                entry.insert(Report {
                    id,
                    username: draft.username,
                    reporter: draft.reporter,
                    job: draft.job,
                    hours: draft.hours,
                    reported_at: draft.reported_at,
                    created_at: now,
                    last_edit_at: draft.last_edit_at,
                    last_update_at: None,
                    attachments: draft.attachments,
                    link: draft.link,
                    secret: draft.secret,
                    paid_time_off: draft.paid_time_off,
                })
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.get(id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// All reports for a username, ascending by business timestamp. One
    /// call delivers one consistent snapshot for the engine to compute on.
    pub fn snapshot_for(&self, username: &str) -> Vec<Report> {
        let mut out: Vec<Report> = self
            .reports
            .values()
            .filter(|r| r.username == username)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.reported_at);
        out
    }
}

/// Business timestamp of the employee's first-ever report, if any.
pub fn first_report_at(reports: &[Report]) -> Option<DateTime<Utc>> {
    reports.iter().map(|r| r.reported_at).min()
}

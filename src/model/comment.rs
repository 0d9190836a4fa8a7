use chrono::{DateTime, NaiveDateTime, Utc};

use super::author::Author;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Source-assigned id, never sent to the target.
    pub id: u64,
    pub author: Option<Author>,
    pub body: String,
    pub created_on: String,
}

impl Comment {
    /// Creation time as reported by the source, if it parses.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_on)
    }
}

/// Bitbucket reports `2012-01-03 08:36:26+00:00`; RFC 3339 and a bare
/// UTC datetime are accepted as well.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Sort comments oldest first. Unparseable timestamps sort before parsed
/// ones and fall back to plain string order among themselves.
pub fn sort_chronologically(comments: &mut [Comment]) {
    comments.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.created_on.cmp(&b.created_on))
    });
}

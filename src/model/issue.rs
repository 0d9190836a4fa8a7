use std::fmt;

use super::author::Author;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueStatus {
    New,
    Open,
    Resolved,
    OnHold,
    Invalid,
    Duplicate,
    Wontfix,
    Other(String),
}

impl IssueStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "new" => IssueStatus::New,
            "open" => IssueStatus::Open,
            "resolved" => IssueStatus::Resolved,
            "on hold" | "on-hold" => IssueStatus::OnHold,
            "invalid" => IssueStatus::Invalid,
            "duplicate" => IssueStatus::Duplicate,
            "wontfix" => IssueStatus::Wontfix,
            _ => IssueStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueStatus::New => "new",
            IssueStatus::Open => "open",
            IssueStatus::Resolved => "resolved",
            IssueStatus::OnHold => "on-hold",
            IssueStatus::Invalid => "invalid",
            IssueStatus::Duplicate => "duplicate",
            IssueStatus::Wontfix => "wontfix",
            IssueStatus::Other(raw) => raw,
        }
    }

    /// Statuses the target has no state for. They never change the issue
    /// state and can only be expressed through labels.
    pub const LABEL_ONLY: [IssueStatus; 4] = [
        IssueStatus::Wontfix,
        IssueStatus::OnHold,
        IssueStatus::Invalid,
        IssueStatus::Duplicate,
    ];

    pub fn is_label_only(&self) -> bool {
        Self::LABEL_ONLY.contains(self)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueMetadata {
    pub milestone: Option<String>,
    pub component: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Sequential id assigned by the source tracker.
    pub id: u64,
    pub title: String,
    /// Raw source wiki markup.
    pub body: String,
    pub status: IssueStatus,
    pub author: Option<Author>,
    /// Passed through verbatim into the provenance footer.
    pub created_on: String,
    pub metadata: IssueMetadata,
}

/// The Bitbucket repository being migrated, used to link back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepo {
    pub account: String,
    pub repo: String,
}

impl SourceRepo {
    pub fn new(account: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            repo: repo.into(),
        }
    }

    pub fn issue_url(&self, id: u64) -> String {
        format!("https://bitbucket.org/{}/{}/issue/{id}", self.account, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(IssueStatus::parse("resolved"), IssueStatus::Resolved);
        assert_eq!(IssueStatus::parse("Open"), IssueStatus::Open);
        assert_eq!(IssueStatus::parse("on hold"), IssueStatus::OnHold);
        assert_eq!(IssueStatus::parse("on-hold"), IssueStatus::OnHold);
        assert_eq!(IssueStatus::parse("wontfix"), IssueStatus::Wontfix);
    }

    #[test]
    fn unknown_status_keeps_raw_text() {
        let status = IssueStatus::parse("closed-ish");
        assert_eq!(status, IssueStatus::Other("closed-ish".into()));
        assert_eq!(status.to_string(), "closed-ish");
    }

    #[test]
    fn label_only_statuses() {
        assert!(IssueStatus::Duplicate.is_label_only());
        assert!(IssueStatus::OnHold.is_label_only());
        assert!(!IssueStatus::Resolved.is_label_only());
        assert!(!IssueStatus::Open.is_label_only());
    }
}

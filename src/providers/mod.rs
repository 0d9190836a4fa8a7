pub mod bitbucket;
pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::comment::Comment;
use crate::model::issue::Issue;
use crate::model::label::Label;

/// Read side of a migration.
#[async_trait]
pub trait IssueSource: Send + Sync {
    fn name(&self) -> &str;
    /// Every issue from `start` on, following the tracker's pagination.
    async fn fetch_issues(&self, start: u64) -> Result<Vec<Issue>>;
    /// Comments with user text, oldest first.
    async fn fetch_comments(&self, issue: &Issue) -> Result<Vec<Comment>>;
    async fn fetch_milestones(&self) -> Result<Vec<String>>;
    async fn fetch_components(&self) -> Result<Vec<String>>;
}

/// Write side of a migration, scoped to one repository.
#[async_trait]
pub trait IssueTarget: Send + Sync {
    fn name(&self) -> &str;
    async fn create_label(&self, label: &Label) -> Result<()>;
    /// Returns the number the target assigned to the new issue.
    async fn create_issue(&self, title: &str, body: &str) -> Result<u64>;
    async fn close_issue(&self, number: u64) -> Result<()>;
    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;
    async fn create_comment(&self, number: u64, body: &str) -> Result<()>;
}

#[cfg(test)]
pub mod tests;

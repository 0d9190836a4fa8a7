use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::{IssueSource, IssueTarget};
use crate::model::comment::Comment;
use crate::model::issue::{Issue, IssueMetadata, IssueStatus};
use crate::model::label::Label;

/// Everything a target was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    CreateLabel(String),
    CreateIssue(String),
    Close(u64),
    AddLabels(u64, Vec<String>),
    Comment(u64, String),
}

/// A target that records calls and hands out sequential issue numbers.
#[derive(Default)]
pub struct MockTarget {
    pub calls: Mutex<Vec<TargetCall>>,
    fail_on_title: Option<String>,
    fail_on_label: Option<String>,
}

impl MockTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_issue(title: &str) -> Self {
        Self {
            fail_on_title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_on_label(name: &str) -> Self {
        Self {
            fail_on_label: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TargetCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn issue_count(&self) -> u64 {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, TargetCall::CreateIssue(_)))
            .count() as u64
    }
}

#[async_trait]
impl IssueTarget for MockTarget {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn create_label(&self, label: &Label) -> Result<()> {
        if self.fail_on_label.as_deref() == Some(label.name.as_str()) {
            anyhow::bail!("Mock label failure");
        }
        self.record(TargetCall::CreateLabel(label.name.clone()));
        Ok(())
    }

    async fn create_issue(&self, title: &str, _body: &str) -> Result<u64> {
        if self.fail_on_title.as_deref() == Some(title) {
            anyhow::bail!("Mock issue failure");
        }
        self.record(TargetCall::CreateIssue(title.to_string()));
        Ok(self.issue_count())
    }

    async fn close_issue(&self, number: u64) -> Result<()> {
        self.record(TargetCall::Close(number));
        Ok(())
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        self.record(TargetCall::AddLabels(number, labels.to_vec()));
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        self.record(TargetCall::Comment(number, body.to_string()));
        Ok(())
    }
}

/// A source serving canned issues; comments are keyed by issue id.
#[derive(Default)]
pub struct MockSource {
    pub issues: Vec<Issue>,
    pub comments: Vec<(u64, Vec<Comment>)>,
    pub milestones: Vec<String>,
    pub components: Vec<String>,
    pub comment_requests: Mutex<Vec<u64>>,
}

#[async_trait]
impl IssueSource for MockSource {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn fetch_issues(&self, start: u64) -> Result<Vec<Issue>> {
        Ok(self.issues.iter().skip(start as usize).cloned().collect())
    }

    async fn fetch_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        self.comment_requests.lock().unwrap().push(issue.id);
        Ok(self
            .comments
            .iter()
            .find(|(id, _)| *id == issue.id)
            .map(|(_, comments)| comments.clone())
            .unwrap_or_default())
    }

    async fn fetch_milestones(&self) -> Result<Vec<String>> {
        Ok(self.milestones.clone())
    }

    async fn fetch_components(&self) -> Result<Vec<String>> {
        Ok(self.components.clone())
    }
}

pub fn make_issue(id: u64, status: IssueStatus) -> Issue {
    Issue {
        id,
        title: format!("Issue {id}"),
        body: format!("Body of issue {id}"),
        status,
        author: None,
        created_on: "2011-05-04 10:00:00".into(),
        metadata: IssueMetadata::default(),
    }
}

pub fn make_comment(id: u64, body: &str) -> Comment {
    Comment {
        id,
        author: None,
        body: body.to_string(),
        created_on: format!("2011-05-05 10:00:{:02}+00:00", id % 60),
    }
}

#[tokio::test]
async fn mock_target_numbers_issues_sequentially() {
    let target = MockTarget::new();
    assert_eq!(target.create_issue("a", "").await.unwrap(), 1);
    assert_eq!(target.create_issue("b", "").await.unwrap(), 2);
}

#[tokio::test]
async fn mock_target_failure_is_not_recorded() {
    let target = MockTarget::failing_on_issue("bad");
    let result = target.create_issue("bad", "").await;
    assert!(result.unwrap_err().to_string().contains("Mock issue failure"));
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn mock_source_honours_start_offset() {
    let source = MockSource {
        issues: (1..=5).map(|id| make_issue(id, IssueStatus::New)).collect(),
        ..MockSource::default()
    };
    let issues = source.fetch_issues(3).await.unwrap();
    assert_eq!(issues.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4, 5]);
}

#[tokio::test]
async fn trait_objects_dispatch() {
    let source: Box<dyn IssueSource> = Box::new(MockSource::default());
    let target: Box<dyn IssueTarget> = Box::new(MockTarget::new());
    assert_eq!(source.name(), "Mock");
    assert_eq!(target.name(), "Mock");
    assert!(source.fetch_milestones().await.unwrap().is_empty());
}

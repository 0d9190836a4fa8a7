use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::IssueSource;
use crate::error::MigrateError;
use crate::model::author::Author;
use crate::model::comment::{sort_chronologically, Comment};
use crate::model::issue::{Issue, IssueMetadata, IssueStatus};

pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/1.0";

pub struct BitbucketSource {
    base_url: String,
    auth_header: Option<String>,
    client: reqwest::Client,
}

impl BitbucketSource {
    /// Anonymous access unless `credentials` carries a username/password.
    pub fn new(
        api_url: &str,
        account: &str,
        repo: &str,
        credentials: Option<(String, String)>,
    ) -> Self {
        let auth_header = credentials.map(|(username, password)| {
            let encoded =
                base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
            format!("Basic {encoded}")
        });
        Self {
            base_url: format!(
                "{}/repositories/{}/{}/issues",
                api_url.trim_end_matches('/'),
                urlencoding::encode(account),
                urlencoding::encode(repo)
            ),
            auth_header,
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header("Accept", "application/json");
        match &self.auth_header {
            Some(auth) => req.header("Authorization", auth),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .get(url)
            .send()
            .await
            .with_context(|| format!("Bitbucket request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Bitbucket rejected {url}"))?;
        let parsed = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Bitbucket response from {url}"))?;
        Ok(parsed)
    }

    async fn fetch_page(&self, start: u64) -> Result<IssuePage> {
        let url = format!("{}/?start={start}", self.base_url);
        let resp = self
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| MigrateError::Connectivity {
                url: url.clone(),
                source,
            })?;
        let page = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Bitbucket issue page from {url}"))?;
        Ok(page)
    }
}

#[derive(Deserialize)]
struct IssuePage {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    issues: Vec<BbIssue>,
}

#[derive(Deserialize)]
struct BbIssue {
    local_id: u64,
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reported_by: Option<Author>,
    #[serde(default)]
    created_on: Option<String>,
    #[serde(default)]
    metadata: Option<BbMetadata>,
}

#[derive(Deserialize, Default)]
struct BbMetadata {
    milestone: Option<String>,
    component: Option<String>,
    kind: Option<String>,
}

#[derive(Deserialize)]
struct BbComment {
    comment_id: u64,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    author_info: Option<Author>,
    #[serde(default)]
    utc_created_on: Option<String>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<BbIssue> for Issue {
    fn from(issue: BbIssue) -> Self {
        let metadata = issue.metadata.unwrap_or_default();
        Issue {
            id: issue.local_id,
            title: issue.title,
            body: issue.content.unwrap_or_default(),
            status: issue
                .status
                .as_deref()
                .map(IssueStatus::parse)
                .unwrap_or(IssueStatus::New),
            author: issue.reported_by,
            created_on: issue.created_on.unwrap_or_default(),
            metadata: IssueMetadata {
                milestone: non_empty(metadata.milestone),
                component: non_empty(metadata.component),
                kind: non_empty(metadata.kind),
            },
        }
    }
}

impl From<BbComment> for Comment {
    fn from(comment: BbComment) -> Self {
        Comment {
            id: comment.comment_id,
            author: comment.author_info,
            body: comment.content.unwrap_or_default(),
            created_on: comment.utc_created_on.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl IssueSource for BitbucketSource {
    fn name(&self) -> &str {
        "Bitbucket"
    }

    async fn fetch_issues(&self, start: u64) -> Result<Vec<Issue>> {
        let mut issues: Vec<Issue> = Vec::new();
        let mut offset = start;

        loop {
            let page = self.fetch_page(offset).await?;
            if page.issues.is_empty() {
                break;
            }
            debug!(
                offset,
                fetched = page.issues.len(),
                total = page.count,
                "fetched issue page"
            );
            offset += page.issues.len() as u64;
            issues.extend(page.issues.into_iter().map(Issue::from));
        }

        Ok(issues)
    }

    async fn fetch_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let url = format!("{}/{}/comments/", self.base_url, issue.id);
        let raw: Vec<BbComment> = self.get_json(&url).await?;

        let mut comments: Vec<Comment> = raw.into_iter().map(Comment::from).collect();
        sort_chronologically(&mut comments);
        // Status changes (assignee, version, ...) come through as comments
        // without a body.
        comments.retain(|c| !c.body.is_empty());
        Ok(comments)
    }

    async fn fetch_milestones(&self) -> Result<Vec<String>> {
        let url = format!("{}/milestones/", self.base_url);
        let milestones: Vec<Named> = self.get_json(&url).await?;
        Ok(milestones.into_iter().map(|m| m.name).collect())
    }

    async fn fetch_components(&self) -> Result<Vec<String>> {
        let url = format!("{}/components/", self.base_url);
        let components: Vec<Named> = self.get_json(&url).await?;
        Ok(components.into_iter().map(|c| c.name).collect())
    }
}

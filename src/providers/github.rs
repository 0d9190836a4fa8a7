use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::IssueTarget;
use crate::error::MigrateError;
use crate::model::label::Label;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub struct GitHubTarget {
    repo_url: String,
    auth_header: String,
    client: reqwest::Client,
}

/// Split `owner/repo` into its parts.
pub fn parse_repo(full_name: &str) -> Result<(String, String), MigrateError> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(MigrateError::InvalidTargetRepo(full_name.to_string())),
    }
}

impl GitHubTarget {
    pub fn new(api_url: &str, owner: &str, repo: &str, username: &str, password: &str) -> Self {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        Self {
            repo_url: format!(
                "{}/repos/{}/{}",
                api_url.trim_end_matches('/'),
                urlencoding::encode(owner),
                urlencoding::encode(repo)
            ),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{path}", self.repo_url);
        debug!(%method, %url, "GitHub request");
        let resp = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("bb2gh/", env!("CARGO_PKG_VERSION")))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("GitHub {method} {url} failed"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub {method} {url} returned {status}: {text}");
        }
        Ok(resp)
    }
}

#[derive(Deserialize)]
struct CreatedIssue {
    number: u64,
}

#[async_trait]
impl IssueTarget for GitHubTarget {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn create_label(&self, label: &Label) -> Result<()> {
        self.send(reqwest::Method::POST, "/labels", json!(label))
            .await
            .with_context(|| format!("Failed to create label '{}'", label.name))?;
        Ok(())
    }

    async fn create_issue(&self, title: &str, body: &str) -> Result<u64> {
        let resp = self
            .send(
                reqwest::Method::POST,
                "/issues",
                json!({ "title": title, "body": body }),
            )
            .await
            .with_context(|| format!("Failed to create issue '{title}'"))?;
        let created: CreatedIssue = resp
            .json()
            .await
            .context("Failed to parse GitHub create-issue response")?;
        Ok(created.number)
    }

    async fn close_issue(&self, number: u64) -> Result<()> {
        self.send(
            reqwest::Method::PATCH,
            &format!("/issues/{number}"),
            json!({ "state": "closed" }),
        )
        .await
        .with_context(|| format!("Failed to close issue #{number}"))?;
        Ok(())
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        self.send(
            reqwest::Method::POST,
            &format!("/issues/{number}/labels"),
            json!({ "labels": labels }),
        )
        .await
        .with_context(|| format!("Failed to label issue #{number}"))?;
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        self.send(
            reqwest::Method::POST,
            &format!("/issues/{number}/comments"),
            json!({ "body": body }),
        )
        .await
        .with_context(|| format!("Failed to comment on issue #{number}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::label::LabelKind;
    use mockito::{Matcher, Server};

    fn target(server: &Server) -> GitHubTarget {
        GitHubTarget::new(&server.url(), "octo", "widgets", "octo", "hunter2")
    }

    #[test]
    fn parse_repo_accepts_owner_and_name() {
        let (owner, repo) = parse_repo("octo/widgets").unwrap();
        assert_eq!(owner, "octo");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn parse_repo_rejects_malformed() {
        for bad in ["widgets", "/widgets", "octo/", "octo/widgets/extra"] {
            assert!(
                matches!(parse_repo(bad), Err(MigrateError::InvalidTargetRepo(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn create_issue_returns_number() {
        let mut server = Server::new_async().await;
        // "octo:hunter2"
        let mock = server
            .mock("POST", "/repos/octo/widgets/issues")
            .match_header("authorization", "Basic b2N0bzpodW50ZXIy")
            .match_header("user-agent", Matcher::Regex("^bb2gh/".into()))
            .match_body(Matcher::Json(serde_json::json!({
                "title": "Crash",
                "body": "It crashes"
            })))
            .with_status(201)
            .with_body(r#"{"number": 17, "state": "open"}"#)
            .create_async()
            .await;

        let number = target(&server).create_issue("Crash", "It crashes").await.unwrap();

        assert_eq!(number, 17);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn close_issue_patches_state() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/repos/octo/widgets/issues/17")
            .match_body(Matcher::Json(serde_json::json!({ "state": "closed" })))
            .with_body("{}")
            .create_async()
            .await;

        target(&server).close_issue(17).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn label_and_comment_calls() {
        let mut server = Server::new_async().await;
        let label = server
            .mock("POST", "/repos/octo/widgets/labels")
            .match_body(Matcher::Json(serde_json::json!({ "name": "v1", "color": "cccccc" })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;
        let attach = server
            .mock("POST", "/repos/octo/widgets/issues/3/labels")
            .match_body(Matcher::Json(serde_json::json!({ "labels": ["import", "v1"] })))
            .with_body("[]")
            .create_async()
            .await;
        let comment = server
            .mock("POST", "/repos/octo/widgets/issues/3/comments")
            .match_body(Matcher::Json(serde_json::json!({ "body": "hi" })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;
        let gh = target(&server);

        gh.create_label(&Label::new("v1", LabelKind::Milestone)).await.unwrap();
        gh.add_labels(3, &["import".to_string(), "v1".to_string()])
            .await
            .unwrap();
        gh.create_comment(3, "hi").await.unwrap();

        label.assert_async().await;
        attach.assert_async().await;
        comment.assert_async().await;
    }

    #[tokio::test]
    async fn api_errors_propagate_with_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/repos/octo/widgets/labels")
            .with_status(422)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create_async()
            .await;

        let err = target(&server).create_label(&Label::import()).await.unwrap_err();

        let chain = format!("{err:#}");
        assert!(chain.contains("Failed to create label 'import'"));
        assert!(chain.contains("422"));
        assert!(chain.contains("Validation Failed"));
    }
}

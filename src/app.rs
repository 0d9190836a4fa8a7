use anyhow::{Context, Result};
use tracing::info;

use crate::migrate::labels::{build_label_set, distinct_kinds, provision_labels};
use crate::migrate::publish::publish_issue;
use crate::migrate::LabelOptions;
use crate::model::comment::Comment;
use crate::model::issue::{Issue, SourceRepo};
use crate::providers::{IssueSource, IssueTarget};
use crate::util::format::format_issue_body;

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub repo: SourceRepo,
    /// Source issue offset to start fetching from.
    pub start_id: u64,
    /// Print what would be created instead of writing to the target.
    pub dry_run: bool,
    pub labels: LabelOptions,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub fetched: usize,
    pub published: usize,
    pub comments: usize,
}

pub struct App<'a> {
    source: &'a dyn IssueSource,
    target: &'a dyn IssueTarget,
    options: MigrationOptions,
}

impl<'a> App<'a> {
    pub fn new(
        source: &'a dyn IssueSource,
        target: &'a dyn IssueTarget,
        options: MigrationOptions,
    ) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        let milestones = self
            .source
            .fetch_milestones()
            .await
            .context("Failed to fetch milestones")?;
        let components = self
            .source
            .fetch_components()
            .await
            .context("Failed to fetch components")?;

        let mut issues = self.source.fetch_issues(self.options.start_id).await?;
        info!(
            source = self.source.name(),
            count = issues.len(),
            start = self.options.start_id,
            "issues fetched"
        );
        // Ascending source ids keep numbering aligned on a fresh target.
        issues.sort_by_key(|issue| issue.id);

        let labels = build_label_set(
            &milestones,
            &components,
            &distinct_kinds(&issues),
            self.options.labels,
        );
        if self.options.dry_run {
            let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
            println!("Labels: {}", names.join(", "));
        } else {
            provision_labels(self.target, &labels).await?;
        }

        let mut report = MigrationReport {
            fetched: issues.len(),
            ..MigrationReport::default()
        };

        for issue in &issues {
            let comments = self
                .source
                .fetch_comments(issue)
                .await
                .with_context(|| format!("Failed to fetch comments for issue {}", issue.id))?;
            let body = format_issue_body(&self.options.repo, issue);
            report.comments += comments.len();

            if self.options.dry_run {
                print_dry_run(issue, &body, &comments);
            } else {
                publish_issue(self.target, issue, &body, &comments, self.options.labels).await?;
                report.published += 1;
            }
        }

        if !self.options.dry_run {
            println!("Created {} issues", report.published);
        }
        Ok(report)
    }
}

fn print_dry_run(issue: &Issue, body: &str, comments: &[Comment]) {
    let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
    println!("Title: {}", issue.title);
    println!("Body: {body}");
    println!("Comments {bodies:?}");
}

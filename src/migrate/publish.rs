use anyhow::Result;
use tracing::{debug, info};

use super::LabelOptions;
use crate::model::comment::Comment;
use crate::model::issue::{Issue, IssueStatus};
use crate::model::label::IMPORT_LABEL;
use crate::providers::IssueTarget;
use crate::util::format::format_comment_body;

/// Labels to attach to one migrated issue, without duplicates.
pub fn issue_labels(issue: &Issue, options: LabelOptions) -> Vec<String> {
    let mut candidates: Vec<Option<&str>> = vec![
        Some(IMPORT_LABEL),
        issue.metadata.milestone.as_deref(),
        issue.metadata.component.as_deref(),
    ];
    if options.kind_labels {
        candidates.push(issue.metadata.kind.as_deref());
    }
    if options.status_labels && issue.status.is_label_only() {
        candidates.push(Some(issue.status.as_str()));
    }

    let mut labels: Vec<String> = Vec::new();
    for name in candidates.into_iter().flatten() {
        if !name.is_empty() && !labels.iter().any(|l| l == name) {
            labels.push(name.to_string());
        }
    }
    labels
}

/// Create the issue on the target, close it if it was resolved, attach its
/// labels and append its comments in order. Returns the new issue number.
///
/// Nothing is rolled back on failure: whatever was created before the
/// failing call stays on the target.
pub async fn publish_issue(
    target: &dyn IssueTarget,
    issue: &Issue,
    body: &str,
    comments: &[Comment],
    options: LabelOptions,
) -> Result<u64> {
    let number = target.create_issue(&issue.title, body).await?;
    debug!(source_id = issue.id, number, "issue created");

    match &issue.status {
        IssueStatus::Resolved => target.close_issue(number).await?,
        status if status.is_label_only() => {
            debug!(source_id = issue.id, %status, "no target state for status");
        }
        _ => {}
    }

    let labels = issue_labels(issue, options);
    target.add_labels(number, &labels).await?;

    for comment in comments {
        target
            .create_comment(number, &format_comment_body(comment))
            .await?;
    }

    println!("Created: {} [{} comments]", issue.title, comments.len());
    info!(source_id = issue.id, number, comments = comments.len(), "issue migrated");
    Ok(number)
}

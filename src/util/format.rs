use crate::model::author::Author;
use crate::model::comment::Comment;
use crate::model::issue::{Issue, SourceRepo};
use crate::util::markup::wiki_to_markdown;

const ANONYMOUS: &str = "Anonymous";

fn separator() -> String {
    "-".repeat(40)
}

/// Display name for a source author: full name when both parts are set,
/// otherwise a link to the Bitbucket profile.
pub fn format_user(author: Option<&Author>) -> String {
    let Some(author) = author else {
        return ANONYMOUS.to_string();
    };
    if let Some(name) = author.full_name() {
        return name;
    }
    match author.username.as_deref() {
        Some(username) if !username.is_empty() => {
            format!("[{username}](http://bitbucket.org/{username})")
        }
        _ => ANONYMOUS.to_string(),
    }
}

pub fn format_issue_body(repo: &SourceRepo, issue: &Issue) -> String {
    format!(
        "{}\n\n{}\n- Bitbucket: {}\n- Originally reported by: {}\n- Originally created at: {}\n",
        wiki_to_markdown(&issue.body),
        separator(),
        repo.issue_url(issue.id),
        format_user(issue.author.as_ref()),
        issue.created_on,
    )
}

pub fn format_comment_body(comment: &Comment) -> String {
    format!(
        "{}\n\n{}\nOriginal comment by: {}\n",
        comment.body,
        separator(),
        format_user(comment.author.as_ref()),
    )
}

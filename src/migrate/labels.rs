use anyhow::Result;
use tracing::info;

use super::LabelOptions;
use crate::model::issue::{Issue, IssueStatus};
use crate::model::label::{Label, LabelKind};
use crate::providers::IssueTarget;

/// Distinct issue kinds in first-seen order.
pub fn distinct_kinds(issues: &[Issue]) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for kind in issues.iter().filter_map(|i| i.metadata.kind.as_ref()) {
        if !kinds.contains(kind) {
            kinds.push(kind.clone());
        }
    }
    kinds
}

/// The import marker, then milestones, components and any optional kind and
/// status labels, in that order.
pub fn build_label_set(
    milestones: &[String],
    components: &[String],
    kinds: &[String],
    options: LabelOptions,
) -> Vec<Label> {
    let mut labels = vec![Label::import()];
    labels.extend(milestones.iter().map(|m| Label::new(m, LabelKind::Milestone)));
    labels.extend(components.iter().map(|c| Label::new(c, LabelKind::Component)));
    if options.kind_labels {
        labels.extend(kinds.iter().map(|k| Label::new(k, LabelKind::Kind)));
    }
    if options.status_labels {
        labels.extend(
            IssueStatus::LABEL_ONLY
                .iter()
                .map(|s| Label::new(s.as_str(), LabelKind::Status)),
        );
    }
    labels
}

/// Create each label on the target, one after another. The first failure
/// aborts the rest; labels already created stay.
pub async fn provision_labels(target: &dyn IssueTarget, labels: &[Label]) -> Result<()> {
    for label in labels {
        target.create_label(label).await?;
    }
    info!(count = labels.len(), target = target.name(), "labels created");
    Ok(())
}

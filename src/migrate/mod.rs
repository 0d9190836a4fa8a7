pub mod labels;
pub mod publish;

/// Optional label mappings beyond milestones and components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelOptions {
    /// Label each issue with its Bitbucket kind (bug, enhancement, ...).
    pub kind_labels: bool,
    /// Label wontfix / on-hold / invalid / duplicate issues with their
    /// status, since the target has no matching state.
    pub status_labels: bool,
}

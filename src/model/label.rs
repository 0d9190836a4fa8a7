use serde::Serialize;

pub const IMPORT_LABEL: &str = "import";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Import,
    Milestone,
    Component,
    Kind,
    Status,
}

impl LabelKind {
    pub fn color(&self) -> &'static str {
        match self {
            LabelKind::Import => "888888",
            LabelKind::Milestone => "cccccc",
            LabelKind::Component => "357ebd",
            LabelKind::Kind => "e99695",
            LabelKind::Status => "ededed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

impl Label {
    pub fn new(name: impl Into<String>, kind: LabelKind) -> Self {
        Self {
            name: name.into(),
            color: kind.color().to_string(),
        }
    }

    pub fn import() -> Self {
        Self::new(IMPORT_LABEL, LabelKind::Import)
    }
}

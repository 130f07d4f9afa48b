use serde::{Deserialize, Serialize};

/// Named wiki views; each one is a single path segment after the wiki start link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    View,
    Edit,
    Create,
    /// Rendered view used for index pages
    Book,
    FormTable,
    History,
    Diff,
    Version,
}

impl ViewMode {
    pub const ALL: [ViewMode; 8] = [
        ViewMode::View,
        ViewMode::Edit,
        ViewMode::Create,
        ViewMode::Book,
        ViewMode::FormTable,
        ViewMode::History,
        ViewMode::Diff,
        ViewMode::Version,
    ];

    pub fn segment(&self) -> &'static str {
        match self {
            ViewMode::View => "view",
            ViewMode::Edit => "edit",
            ViewMode::Create => "create",
            ViewMode::Book => "book",
            ViewMode::FormTable => "formTable",
            ViewMode::History => "history",
            ViewMode::Diff => "diff",
            ViewMode::Version => "version",
        }
    }

    /// Modes a "view this" transition replaces in the current location.
    pub fn view_sources() -> &'static [ViewMode] {
        &[ViewMode::Edit, ViewMode::Create]
    }

    /// Modes an "edit this" transition replaces in the current location.
    pub fn edit_sources() -> &'static [ViewMode] {
        &[ViewMode::View, ViewMode::Create]
    }

    /// Modes a "create here" transition replaces in the current location.
    pub fn create_sources() -> &'static [ViewMode] {
        &[ViewMode::View, ViewMode::Edit, ViewMode::FormTable]
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.segment() == s)
            .ok_or_else(|| format!("Unknown view mode: {}", s))
    }
}

use serde::{Deserialize, Serialize};

/// A file or folder listed in a wiki directory or a commit tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub directory: bool,
    #[serde(default, alias = "xml_namespaces", rename = "xmlNamespaces")]
    pub xml_namespaces: Vec<String>,
    #[serde(default, rename = "iconUrl", skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl FileEntry {
    pub fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn folder(name: &str, path: &str) -> Self {
        Self {
            directory: true,
            ..Self::file(name, path)
        }
    }
}

/// How a commit touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitChange {
    Add,
    Delete,
    Modify,
}

impl CommitChange {
    /// Classify a git change type such as `ADD`, `DELETE` or `MODIFY`.
    pub fn from_change_type(change_type: &str) -> Option<Self> {
        let lower = change_type.to_lowercase();
        if lower.is_empty() {
            None
        } else if lower.starts_with('a') {
            Some(CommitChange::Add)
        } else if lower.starts_with('d') {
            Some(CommitChange::Delete)
        } else {
            Some(CommitChange::Modify)
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            CommitChange::Add => "change-add",
            CommitChange::Delete => "change-delete",
            CommitChange::Modify => "change-modify",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CommitChange::Add => "added",
            CommitChange::Delete => "deleted",
            CommitChange::Modify => "modified",
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<span class=\"{}\">{}</span>",
            self.css_class(),
            self.title()
        )
    }

    /// Deleted files have nothing left to link to.
    pub fn has_file_link(&self) -> bool {
        !matches!(self, CommitChange::Delete)
    }
}

use serde::{Deserialize, Serialize};

use crate::model::PageId;

pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Route values describing which document a wiki view is showing.
///
/// Built fresh for every navigation and never mutated during a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiLinkContext {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub page_id: PageId,
    /// Whether the current view lists child documents (a folder view)
    #[serde(default)]
    pub has_children: bool,
}

impl WikiLinkContext {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            namespace: None,
            branch: None,
            page_id: PageId::root(),
            has_children: false,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|n: &String| !n.is_empty());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into()).filter(|b: &String| !b.is_empty());
        self
    }

    pub fn with_page(mut self, page_id: impl Into<PageId>) -> Self {
        self.page_id = page_id.into();
        self
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Branch to read content from; `master` when the route carries none.
    pub fn effective_branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn effective_namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}

/// The in-app location the browser is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub hash: String,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: String::new(),
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// The hash suffix to carry over onto rewritten links, `#` included.
    pub fn hash_suffix(&self) -> String {
        let hash = self.hash.trim_start_matches('#');
        if hash.is_empty() {
            String::new()
        } else {
            format!("#{}", hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_defaults_to_master() {
        let ctx = WikiLinkContext::new("demo");
        assert_eq!(ctx.branch, None);
        assert_eq!(ctx.effective_branch(), "master");
        assert_eq!(ctx.with_branch("dev").effective_branch(), "dev");
    }

    #[test]
    fn empty_branch_is_absent() {
        let ctx = WikiLinkContext::new("demo").with_branch("");
        assert_eq!(ctx.branch, None);
    }

    #[test]
    fn hash_suffix_adds_marker_once() {
        assert_eq!(Location::new("/a").hash_suffix(), "");
        assert_eq!(Location::new("/a").with_hash("top").hash_suffix(), "#top");
        assert_eq!(Location::new("/a").with_hash("#top").hash_suffix(), "#top");
    }
}

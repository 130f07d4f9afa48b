use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Route parameters are limited to `path0..path99` when a page is split over
/// several router segments.
const MAX_PATH_PARAMS: usize = 100;

const WIKI_PREFIX: &str = "/wiki/";

/// Slash-delimited logical path of a document within a repository branch.
///
/// The root page is `"/"`; any run of leading slashes collapses to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PageId(String);

impl PageId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(normalize(path.into()))
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the page from router parameters: an explicit `page` value wins,
    /// otherwise `path0`, `path1`, ... are joined until the first gap.
    pub fn from_route_params(params: &HashMap<String, String>) -> Self {
        if let Some(page) = params.get("page").filter(|p| !p.is_empty()) {
            return Self::new(page.clone());
        }

        let segments: Vec<&str> = (0..MAX_PATH_PARAMS)
            .map_while(|i| params.get(&format!("path{}", i)).map(|s| s.as_str()))
            .collect();

        if segments.is_empty() {
            Self::root()
        } else {
            Self::new(segments.join("/"))
        }
    }
}

fn normalize(path: String) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.len() == path.len() {
        path
    } else {
        format!("/{}", trimmed)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PageId> for String {
    fn from(value: PageId) -> Self {
        value.0
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the page part of a `/wiki/<view>/<page...>` location path.
pub fn page_id_from_uri(url: &str) -> Option<String> {
    let rest = url.strip_prefix(WIKI_PREFIX)?;
    // the view segment must be non-empty before its closing slash
    let idx = rest.get(1..)?.find('/')? + 1;
    Some(rest[idx + 1..].to_string())
}

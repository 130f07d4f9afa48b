use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::logic::paths::join_url;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("public path {0} is mapped by more than one proxy rule")]
    DuplicatePublicPath(String),
}

/// A parsed upstream URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamEndpoint {
    pub raw: String,
    pub protocol: String,
    pub hostname: String,
    /// Only set when the URL names a port explicitly
    pub port: Option<u16>,
    pub path: String,
}

impl UpstreamEndpoint {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            protocol: url.scheme().to_string(),
            hostname: url.host_str().unwrap_or_default().to_string(),
            port: url.port(),
            path: url.path().to_string(),
        })
    }

    /// Keep an unparseable URL around verbatim; requests against it fail
    /// when they are proxied, not when the table is built.
    pub fn unparsed(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            protocol: "http".to_string(),
            hostname: raw.to_string(),
            port: None,
            path: "/".to_string(),
        }
    }

    /// `host[:port]`, with the port only when explicit.
    pub fn host_port(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        }
    }
}

impl std::fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Maps requests under `public_path` onto `upstream_path` of another host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRule {
    pub protocol: String,
    pub hostname: String,
    pub port: Option<u16>,
    pub public_path: String,
    pub upstream_path: String,
}

impl ProxyRule {
    /// Rule on the same host as `endpoint`.
    pub fn on_endpoint(endpoint: &UpstreamEndpoint, public_path: &str, upstream_path: &str) -> Self {
        Self {
            protocol: endpoint.protocol.clone(),
            hostname: endpoint.hostname.clone(),
            port: endpoint.port,
            public_path: public_path.to_string(),
            upstream_path: upstream_path.to_string(),
        }
    }

    /// Whether `path` is the public path itself or lies beneath it.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.public_path.as_str()) {
            Some(rest) => {
                rest.is_empty() || rest.starts_with('/') || self.public_path.ends_with('/')
            }
            None => false,
        }
    }

    pub fn origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.hostname, port),
            None => format!("{}://{}", self.protocol, self.hostname),
        }
    }

    /// Full upstream URL for a request path that this rule matches.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let rest = path.strip_prefix(self.public_path.as_str()).unwrap_or(path);
        let target_path = if rest.is_empty() || rest == "/" {
            let mut p = self.upstream_path.clone();
            if rest == "/" && !p.ends_with('/') {
                p.push('/');
            }
            p
        } else {
            join_url(&[self.upstream_path.as_str(), rest])
        };
        let target_path = if target_path.starts_with('/') {
            target_path
        } else {
            format!("/{}", target_path)
        };

        match query.filter(|q| !q.is_empty()) {
            Some(q) => format!("{}{}?{}", self.origin(), target_path, q),
            None => format!("{}{}", self.origin(), target_path),
        }
    }
}

/// Ordered proxy rules; the first rule matching a request handles it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTable {
    rules: Vec<ProxyRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<ProxyRule>) -> Result<Self, RouteError> {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.public_path == rule.public_path) {
                return Err(RouteError::DuplicatePublicPath(rule.public_path.clone()));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

/// A directory searched for static files under `public_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAssetRoot {
    pub public_path: String,
    pub directory: PathBuf,
}

impl StaticAssetRoot {
    pub fn new(public_path: &str, directory: impl Into<PathBuf>) -> Self {
        Self {
            public_path: public_path.to_string(),
            directory: directory.into(),
        }
    }
}

/// Values derived while building the table that the server bootstrap needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSettings {
    pub kube: UpstreamEndpoint,
    pub oapi: UpstreamEndpoint,
    pub kube_base: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub debug_logging_of_proxy: bool,
    pub use_authentication: bool,
}

/// Everything the development server needs to present one origin to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevServerConfig {
    pub port: u16,
    pub proxy_rules: RouteTable,
    pub static_assets: Vec<StaticAssetRoot>,
    /// Document served for unknown paths so client-side routes resolve
    pub fallback: PathBuf,
    pub live_reload: bool,
    /// Skip TLS certificate checks towards upstreams. Local development only.
    pub insecure_transport: bool,
    pub other: DerivedSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(public_path: &str, upstream_path: &str) -> ProxyRule {
        ProxyRule {
            protocol: "https".to_string(),
            hostname: "localhost".to_string(),
            port: Some(8443),
            public_path: public_path.to_string(),
            upstream_path: upstream_path.to_string(),
        }
    }

    #[test]
    fn endpoint_keeps_explicit_port_only() {
        let with_port = UpstreamEndpoint::parse("https://localhost:8443/api").unwrap();
        assert_eq!(with_port.port, Some(8443));
        assert_eq!(with_port.host_port(), "localhost:8443");
        assert_eq!(with_port.path, "/api");

        let default_port = UpstreamEndpoint::parse("https://example.com/oapi").unwrap();
        assert_eq!(default_port.port, None);
        assert_eq!(default_port.host_port(), "example.com");
    }

    #[test]
    fn matches_on_segment_boundaries() {
        let r = rule("/git", "/hawtio/git");
        assert!(r.matches("/git"));
        assert!(r.matches("/git/repo"));
        assert!(!r.matches("/github"));
        assert!(!r.matches("/other"));
    }

    #[test]
    fn target_url_rebases_path_and_keeps_query() {
        let r = rule("/kubernetes/api", "/api");
        assert_eq!(
            r.target_url("/kubernetes/api/v1/pods", Some("watch=true")),
            "https://localhost:8443/api/v1/pods?watch=true"
        );
        assert_eq!(
            r.target_url("/kubernetes/api", None),
            "https://localhost:8443/api"
        );

        let root = rule("/services/gogs", "/");
        assert_eq!(
            root.target_url("/services/gogs/user/login", None),
            "https://localhost:8443/user/login"
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let table = RouteTable::new(vec![
            rule("/kubernetes/api/v1beta2/proxy/services/gogs", "/"),
            rule("/kubernetes/api", "/api"),
        ])
        .unwrap();

        let hit = table.find("/kubernetes/api/v1beta2/proxy/services/gogs/x").unwrap();
        assert_eq!(hit.upstream_path, "/");
        let hit = table.find("/kubernetes/api/v1/namespaces").unwrap();
        assert_eq!(hit.upstream_path, "/api");
        assert!(table.find("/index.html").is_none());
    }

    #[test]
    fn duplicate_public_paths_are_rejected() {
        let err = RouteTable::new(vec![rule("/git", "/a"), rule("/git", "/b")]).unwrap_err();
        assert_eq!(err, RouteError::DuplicatePublicPath("/git".to_string()));
    }
}

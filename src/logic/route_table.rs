use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::logic::paths::join_url;
use crate::model::{
    DerivedSettings, DevServerConfig, ProxyRule, RouteTable, StaticAssetRoot, UpstreamEndpoint,
};

pub const DEFAULT_KUBERNETES_MASTER: &str = "https://localhost:8443";
pub const DEFAULT_PORT: u16 = 9000;
const DEFAULT_GOGS_PORT: &str = "3000";

/// Read access to environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// Boolean flags are only on for the literal string `true`.
    fn flag(&self, key: &str) -> bool {
        self.var(key).as_deref() == Some("true")
    }

    /// Host-style variables are on when set to anything non-empty.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Where static assets live and which document answers unknown paths.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLayout {
    pub root: PathBuf,
    /// Each immediate subdirectory becomes an extra asset root
    pub libs_dir: PathBuf,
    pub fallback: PathBuf,
}

impl AssetLayout {
    /// Serving the source tree while developing.
    pub fn development(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            root: base.to_path_buf(),
            libs_dir: base.join("libs"),
            fallback: base.join("index.html"),
        }
    }

    /// Serving the packaged site.
    pub fn site(base: impl AsRef<Path>) -> Self {
        let site = base.as_ref().join("site");
        Self {
            libs_dir: site.join("libs"),
            fallback: site.join("404.html"),
            root: site,
        }
    }
}

/// A local service that can replace its in-cluster counterpart.
struct LocalOverride {
    env_var: &'static str,
    hostname: &'static str,
    port: u16,
    public_path: &'static str,
    upstream_path: &'static str,
}

/// Flag-enabled overrides in the order they are layered.
const FLAG_OVERRIDES: &[LocalOverride] = &[
    LocalOverride {
        env_var: "LOCAL_APP_LIBRARY",
        hostname: "localhost",
        port: 8588,
        public_path: "/kubernetes/api/v1beta2/proxy/services/app-library",
        upstream_path: "/",
    },
    LocalOverride {
        env_var: "LOCAL_APIMAN",
        hostname: "172.30.97.49",
        port: 8998,
        public_path: "/api/v1beta3/namespaces/default/services/apiman",
        upstream_path: "/apiman",
    },
    LocalOverride {
        env_var: "LOCAL_FABRIC8_FORGE",
        hostname: "localhost",
        port: 8080,
        public_path: "/kubernetes/api/v1beta2/proxy/services/fabric8-forge",
        upstream_path: "/",
    },
];

pub const GOGS_PUBLIC_PATH: &str = "/kubernetes/api/v1beta2/proxy/services/gogs-http-service";

/// Builds the development server configuration from the environment.
///
/// The environment and the library directory are each read once, during
/// [`RouteTableBuilder::build`].
pub struct RouteTableBuilder<'a, E: EnvSource> {
    env: &'a E,
    layout: AssetLayout,
    port: u16,
    insecure_transport: bool,
}

impl<'a, E: EnvSource> RouteTableBuilder<'a, E> {
    pub fn new(env: &'a E, layout: AssetLayout) -> Self {
        Self {
            env,
            layout,
            port: DEFAULT_PORT,
            insecure_transport: true,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Whether upstream TLS certificates go unchecked (the default for local
    /// development against self-signed cluster certificates).
    pub fn insecure_transport(mut self, insecure: bool) -> Self {
        self.insecure_transport = insecure;
        self
    }

    pub fn build(self) -> anyhow::Result<DevServerConfig> {
        let kube_base = self
            .env
            .non_empty("KUBERNETES_MASTER")
            .unwrap_or_else(|| DEFAULT_KUBERNETES_MASTER.to_string());
        let kube = endpoint(&join_url(&[&kube_base, "api"]));
        let oapi = endpoint(&join_url(&[&kube_base, "oapi"]));
        info!("Connecting to Kubernetes on: {}", kube);

        let mut rules = self.local_overrides();
        rules.extend(default_rules(&kube, &oapi));
        let proxy_rules = RouteTable::new(rules)?;

        let static_assets = self.static_assets();

        let other = DerivedSettings {
            kube,
            oapi,
            kube_base,
            google_client_id: self.env.non_empty("GOOGLE_OAUTH_CLIENT_ID"),
            google_client_secret: self.env.non_empty("GOOGLE_OAUTH_CLIENT_SECRET"),
            debug_logging_of_proxy: self.env.flag("DEBUG_PROXY"),
            use_authentication: !self.env.flag("DISABLE_OAUTH"),
        };

        Ok(DevServerConfig {
            port: self.port,
            proxy_rules,
            static_assets,
            fallback: self.layout.fallback,
            live_reload: true,
            insecure_transport: self.insecure_transport,
            other,
        })
    }

    fn local_overrides(&self) -> Vec<ProxyRule> {
        let mut rules = Vec::new();

        for local in FLAG_OVERRIDES {
            if self.env.flag(local.env_var) {
                info!(
                    "because of ${} being true we are using a local proxy for {}",
                    local.env_var, local.public_path
                );
                rules.push(ProxyRule {
                    protocol: "http".to_string(),
                    hostname: local.hostname.to_string(),
                    port: Some(local.port),
                    public_path: local.public_path.to_string(),
                    upstream_path: local.upstream_path.to_string(),
                });
            }
        }

        if let Some(gogs_host) = self.env.non_empty("LOCAL_GOGS_HOST") {
            let gogs_port = self
                .env
                .non_empty("LOCAL_GOGS_PORT")
                .unwrap_or_else(|| DEFAULT_GOGS_PORT.to_string());
            let port = match gogs_port.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Ignoring invalid LOCAL_GOGS_PORT {:?}", gogs_port);
                    None
                }
            };
            info!(
                "because of LOCAL_GOGS_HOST being set we are using a local proxy for {} to point to http://{}:{}",
                GOGS_PUBLIC_PATH, gogs_host, gogs_port
            );
            rules.push(ProxyRule {
                protocol: "http".to_string(),
                hostname: gogs_host,
                port,
                public_path: GOGS_PUBLIC_PATH.to_string(),
                upstream_path: "/".to_string(),
            });
        }

        rules
    }

    fn static_assets(&self) -> Vec<StaticAssetRoot> {
        let mut roots = vec![StaticAssetRoot::new("/", self.layout.root.clone())];
        roots.extend(
            library_dirs(&self.layout.libs_dir)
                .into_iter()
                .map(|dir| {
                    info!("Adding directory to search path: {}", dir.display());
                    StaticAssetRoot::new("/", dir)
                }),
        );
        roots
    }
}

/// Rules towards the cluster, in routing order.
pub fn default_rules(kube: &UpstreamEndpoint, oapi: &UpstreamEndpoint) -> Vec<ProxyRule> {
    vec![
        ProxyRule::on_endpoint(kube, "/kubernetes/api", &kube.path),
        ProxyRule::on_endpoint(oapi, "/kubernetes/oapi", &oapi.path),
        ProxyRule::on_endpoint(kube, "/jolokia", "/hawtio/jolokia"),
        ProxyRule::on_endpoint(kube, "/git", "/hawtio/git"),
    ]
}

fn endpoint(raw: &str) -> UpstreamEndpoint {
    UpstreamEndpoint::parse(raw).unwrap_or_else(|e| {
        warn!("Upstream URL {} is not valid ({}); proxying to it will fail", raw, e);
        UpstreamEndpoint::unparsed(raw)
    })
}

/// Immediate subdirectories of `dir`, sorted by name.
fn library_dirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            info!("No library directory at {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(pairs: &[(&str, &str)]) -> DevServerConfig {
        let env = env(pairs);
        let dir = tempfile::tempdir().unwrap();
        RouteTableBuilder::new(&env, AssetLayout::development(dir.path()))
            .build()
            .unwrap()
    }

    fn public_paths(config: &DevServerConfig) -> Vec<&str> {
        config
            .proxy_rules
            .rules()
            .iter()
            .map(|r| r.public_path.as_str())
            .collect()
    }

    #[test]
    fn defaults_only_without_overrides() {
        let config = build(&[]);
        assert_eq!(
            public_paths(&config),
            vec!["/kubernetes/api", "/kubernetes/oapi", "/jolokia", "/git"]
        );

        let rules = config.proxy_rules.rules();
        assert_eq!(rules[0].protocol, "https");
        assert_eq!(rules[0].hostname, "localhost");
        assert_eq!(rules[0].port, Some(8443));
        assert_eq!(rules[0].upstream_path, "/api");
        assert_eq!(rules[1].upstream_path, "/oapi");
        assert_eq!(rules[2].upstream_path, "/hawtio/jolokia");
        assert_eq!(rules[3].upstream_path, "/hawtio/git");
    }

    #[test]
    fn packaged_values() {
        let config = build(&[]);
        assert_eq!(config.port, 9000);
        assert!(config.live_reload);
        assert!(config.insecure_transport);
        assert!(config.fallback.ends_with("index.html"));
        assert_eq!(config.other.kube_base, "https://localhost:8443");
        assert!(config.other.use_authentication);
        assert!(!config.other.debug_logging_of_proxy);
        assert_eq!(config.other.google_client_id, None);
    }

    #[test]
    fn upstream_base_comes_from_env() {
        let config = build(&[("KUBERNETES_MASTER", "https://cluster.example.com:6443/")]);
        assert_eq!(config.other.kube.raw, "https://cluster.example.com:6443/api");
        assert_eq!(config.other.oapi.path, "/oapi");
        assert_eq!(config.proxy_rules.rules()[0].hostname, "cluster.example.com");
    }

    #[test]
    fn gogs_host_override_shadows_default() {
        let config = build(&[("LOCAL_GOGS_HOST", "myhost")]);
        let rules = config.proxy_rules.rules();

        assert_eq!(rules[0].hostname, "myhost");
        assert_eq!(rules[0].port, Some(3000));
        assert_eq!(rules[0].protocol, "http");
        assert_eq!(rules[0].public_path, GOGS_PUBLIC_PATH);

        let shadowed = rules[1..]
            .iter()
            .position(|r| r.matches(GOGS_PUBLIC_PATH))
            .expect("default rule still present");
        assert_eq!(rules[1 + shadowed].public_path, "/kubernetes/api");

        let hit = config.proxy_rules.find("/kubernetes/api/v1beta2/proxy/services/gogs-http-service/repos");
        assert_eq!(hit.unwrap().hostname, "myhost");
    }

    #[test]
    fn gogs_port_is_configurable() {
        let config = build(&[("LOCAL_GOGS_HOST", "myhost"), ("LOCAL_GOGS_PORT", "3300")]);
        assert_eq!(config.proxy_rules.rules()[0].port, Some(3300));
    }

    #[test]
    fn flag_overrides_need_literal_true() {
        let config = build(&[
            ("LOCAL_APP_LIBRARY", "1"),
            ("LOCAL_APIMAN", "TRUE"),
            ("LOCAL_FABRIC8_FORGE", "true"),
            ("LOCAL_GOGS_HOST", ""),
        ]);
        assert_eq!(
            public_paths(&config),
            vec![
                "/kubernetes/api/v1beta2/proxy/services/fabric8-forge",
                "/kubernetes/api",
                "/kubernetes/oapi",
                "/jolokia",
                "/git"
            ]
        );
        assert_eq!(config.proxy_rules.rules()[0].port, Some(8080));
    }

    #[test]
    fn overrides_keep_fixed_order() {
        let config = build(&[
            ("LOCAL_GOGS_HOST", "gogs"),
            ("LOCAL_FABRIC8_FORGE", "true"),
            ("LOCAL_APIMAN", "true"),
            ("LOCAL_APP_LIBRARY", "true"),
        ]);
        let paths = public_paths(&config);
        assert_eq!(paths.len(), 8);
        assert!(paths[0].ends_with("app-library"));
        assert!(paths[1].ends_with("apiman"));
        assert!(paths[2].ends_with("fabric8-forge"));
        assert_eq!(paths[3], GOGS_PUBLIC_PATH);
        assert_eq!(paths[4], "/kubernetes/api");
    }

    #[test]
    fn auth_and_debug_flags() {
        let config = build(&[
            ("DISABLE_OAUTH", "true"),
            ("DEBUG_PROXY", "true"),
            ("GOOGLE_OAUTH_CLIENT_ID", "id"),
            ("GOOGLE_OAUTH_CLIENT_SECRET", "secret"),
        ]);
        assert!(!config.other.use_authentication);
        assert!(config.other.debug_logging_of_proxy);
        assert_eq!(config.other.google_client_id.as_deref(), Some("id"));
        assert_eq!(config.other.google_client_secret.as_deref(), Some("secret"));

        let config = build(&[("DISABLE_OAUTH", "yes")]);
        assert!(config.other.use_authentication);
    }

    #[test]
    fn malformed_upstream_still_builds() {
        let config = build(&[("KUBERNETES_MASTER", "not a url")]);
        assert_eq!(config.proxy_rules.len(), 4);
        assert_eq!(config.other.kube.raw, "not a url/api");
    }

    #[test]
    fn library_subdirectories_become_roots() {
        let dir = tempfile::tempdir().unwrap();
        let libs = dir.path().join("libs");
        std::fs::create_dir_all(libs.join("zeta")).unwrap();
        std::fs::create_dir_all(libs.join("alpha")).unwrap();
        std::fs::write(libs.join("README.txt"), "not a dir").unwrap();

        let env = env(&[]);
        let config = RouteTableBuilder::new(&env, AssetLayout::development(dir.path()))
            .build()
            .unwrap();

        let dirs: Vec<PathBuf> = config
            .static_assets
            .iter()
            .map(|root| root.directory.clone())
            .collect();
        assert_eq!(
            dirs,
            vec![dir.path().to_path_buf(), libs.join("alpha"), libs.join("zeta")]
        );
        assert!(config.static_assets.iter().all(|r| r.public_path == "/"));
    }

    #[test]
    fn missing_library_dir_leaves_project_root() {
        let config = build(&[]);
        assert_eq!(config.static_assets.len(), 1);
    }

    #[test]
    fn site_layout_serves_packaged_tree() {
        let layout = AssetLayout::site("/srv/console");
        assert_eq!(layout.root, PathBuf::from("/srv/console/site"));
        assert_eq!(layout.libs_dir, PathBuf::from("/srv/console/site/libs"));
        assert_eq!(layout.fallback, PathBuf::from("/srv/console/site/404.html"));
    }
}

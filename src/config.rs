use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logic::AssetLayout;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetsMode {
    /// Serve the working tree, falling back to `index.html`
    Development,
    /// Serve the packaged `site/` tree, falling back to `404.html`
    Site,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    pub mode: AssetsMode,
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Accept self-signed certificates from the cluster
    pub insecure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: crate::logic::DEFAULT_PORT,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            mode: AssetsMode::Development,
            root: ".".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { insecure: true }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("config").required(false));

        // Environment variables with prefix "CONSOLE_", e.g. CONSOLE_SERVER_PORT
        config = config.add_source(
            config::Environment::with_prefix("CONSOLE")
                .separator("_")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Origin browsers use to reach the server; wildcard binds map to localhost.
    pub fn public_origin(&self) -> String {
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "localhost",
            host => host,
        };
        format!("http://{}:{}", host, self.server.port)
    }

    pub fn asset_layout(&self) -> AssetLayout {
        let root = PathBuf::from(&self.assets.root);
        match self.assets.mode {
            AssetsMode::Development => AssetLayout::development(root),
            AssetsMode::Site => AssetLayout::site(root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_console_port() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "127.0.0.1:9000");
        assert!(config.upstream.insecure);
        assert_eq!(config.assets.mode, AssetsMode::Development);
    }

    #[test]
    fn wildcard_bind_is_public_on_localhost() {
        let mut config = AppConfig::default();
        assert_eq!(config.public_origin(), "http://127.0.0.1:9000");
        config.server.host = "0.0.0.0".to_string();
        assert_eq!(config.public_origin(), "http://localhost:9000");
    }

    #[test]
    fn layout_follows_mode() {
        let mut config = AppConfig::default();
        config.assets.root = "/srv/console".to_string();
        assert_eq!(
            config.asset_layout().fallback,
            PathBuf::from("/srv/console/index.html")
        );

        config.assets.mode = AssetsMode::Site;
        assert_eq!(
            config.asset_layout().fallback,
            PathBuf::from("/srv/console/site/404.html")
        );
    }

    #[test]
    fn assets_section_has_only_serving_settings() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        let keys: Vec<&String> = value["assets"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["mode", "root"]);
    }

    #[test]
    fn mode_deserializes_lowercase() {
        let mode: AssetsMode = serde_json::from_str("\"site\"").unwrap();
        assert_eq!(mode, AssetsMode::Site);
    }
}

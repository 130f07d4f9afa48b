use std::sync::Arc;

use crate::model::{ClientConfig, DevServerConfig, VersionInfo};

/// Shared, read-only state of a running development server.
#[derive(Debug)]
pub struct DevServer {
    pub config: DevServerConfig,
    /// Shared connection pool for every proxied request
    pub client: reqwest::Client,
    pub version: VersionInfo,
    pub client_config: ClientConfig,
}

pub type SharedState = Arc<DevServer>;

impl DevServer {
    /// `public_origin` is the address browsers use to reach this server.
    pub fn new(
        config: DevServerConfig,
        version: VersionInfo,
        public_origin: &str,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_transport)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let client_config = ClientConfig::from_settings(&config.other, public_origin);

        Ok(Self {
            config,
            client,
            version,
            client_config,
        })
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

use serde::Serialize;

use crate::logic::paths::join_url;
use crate::model::{DerivedSettings, UpstreamEndpoint};

const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const OPENSHIFT_OAUTH_CLIENT_ID: &str = "fabric8";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub proto: String,
    pub host_port: String,
    pub prefix: String,
}

impl From<&UpstreamEndpoint> for ApiEndpoint {
    fn from(endpoint: &UpstreamEndpoint) -> Self {
        Self {
            proto: endpoint.protocol.clone(),
            host_port: endpoint.host_port(),
            prefix: endpoint.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEndpoints {
    pub openshift: ApiEndpoint,
    pub k8s: ApiEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleOAuth {
    pub client_id: String,
    pub client_secret: String,
    #[serde(rename = "authenticationURI")]
    pub authentication_uri: String,
    #[serde(rename = "authorizationURI")]
    pub authorization_uri: String,
    pub scope: String,
    #[serde(rename = "redirectURI")]
    pub redirect_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenShiftOAuth {
    pub oauth_authorize_uri: String,
    pub oauth_client_id: String,
}

/// Bootstrap settings handed to the browser as `window.OPENSHIFT_CONFIG`.
///
/// Without a `master_uri` the browser talks to the raw upstream base URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    pub api: ApiEndpoints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleOAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openshift: Option<OpenShiftOAuth>,
}

impl ClientConfig {
    /// `public_origin` is where the browser reaches this server, e.g. `http://localhost:9000`.
    pub fn from_settings(settings: &DerivedSettings, public_origin: &str) -> Self {
        let api = ApiEndpoints {
            openshift: ApiEndpoint::from(&settings.oapi),
            k8s: ApiEndpoint::from(&settings.kube),
        };

        let google_credentials = settings
            .google_client_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .zip(
                settings
                    .google_client_secret
                    .as_ref()
                    .filter(|secret| !secret.is_empty()),
            );

        if let Some((client_id, client_secret)) = google_credentials {
            // the browser goes through this server's proxy
            return Self {
                api,
                master_uri: Some(join_url(&[public_origin, "kubernetes"])),
                google: Some(GoogleOAuth {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    authentication_uri: GOOGLE_AUTH_URI.to_string(),
                    authorization_uri: GOOGLE_AUTH_URI.to_string(),
                    scope: "profile".to_string(),
                    redirect_uri: public_origin.to_string(),
                }),
                openshift: None,
            };
        }

        if settings.use_authentication {
            return Self {
                api,
                master_uri: Some(settings.kube_base.clone()),
                google: None,
                openshift: Some(OpenShiftOAuth {
                    oauth_authorize_uri: join_url(&[settings.kube_base.as_str(), "/oauth/authorize"]),
                    oauth_client_id: OPENSHIFT_OAUTH_CLIENT_ID.to_string(),
                }),
            };
        }

        Self {
            api,
            master_uri: None,
            google: None,
            openshift: None,
        }
    }

    /// Render as the script body served at `/osconsole/config.js`.
    pub fn to_script(&self) -> serde_json::Result<String> {
        Ok(format!(
            "window.OPENSHIFT_CONFIG = {}",
            serde_json::to_string_pretty(self)?
        ))
    }
}

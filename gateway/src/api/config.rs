use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// TCP socket address to listen for incoming connections.
    ///
    /// Default: `0.0.0.0:3000`
    pub listen_addr: SocketAddr,

    /// The only browser origin allowed to call the API.
    ///
    /// Default: `http://localhost:8080`
    pub allow_origin: String,

    /// Upper bound for handling a single request.
    ///
    /// Default: `25s`
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Answer `GET /api/devices` with `201 Created` instead of `200 OK`.
    ///
    /// Older dashboard builds expect it.
    pub legacy_status_codes: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: (Ipv4Addr::UNSPECIFIED, 3000).into(),
            allow_origin: "http://localhost:8080".to_owned(),
            request_timeout: Duration::from_secs(25),
            legacy_status_codes: false,
        }
    }
}

/// Sensitive credentials — loaded exclusively from environment variables.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ApiSecrets {
    pub onestepgps_api_key: String,
}

impl ApiSecrets {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            onestepgps_api_key: std::env::var("ONESTEPGPS_API_KEY")
                .context("ONESTEPGPS_API_KEY not set")?,
        })
    }
}

impl std::fmt::Debug for ApiSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSecrets")
            .field("onestepgps_api_key", &"***")
            .finish()
    }
}

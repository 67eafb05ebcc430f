//! Server configuration.

use chanauth_core::AuthConfig;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Demo server configuration.
///
/// TLS is mandatory: there is no channel binding, and therefore no
/// authentication, without it.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:8443"`).
    #[builder(default = String::from("0.0.0.0:8443"))]
    pub gateway_listen: String,

    /// PEM file holding the server certificate chain.
    #[builder(default, setter(strip_option))]
    pub tls_cert_path: Option<String>,

    /// PEM file holding the server private key.
    #[builder(default, setter(strip_option))]
    pub tls_key_path: Option<String>,

    /// JSON file mapping user names to their public keys. Without it every
    /// fresh verification fails.
    #[builder(default, setter(strip_option))]
    pub keys_file: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Authentication settings.
    #[builder(default)]
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8443"),
            tls_cert_path: None,
            tls_key_path: None,
            keys_file: None,
            log_level: String::from("info"),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8443` |
    /// | `TLS_CERT_PATH` | *(required)* |
    /// | `TLS_KEY_PATH` | *(required)* |
    /// | `KEYS_FILE` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// plus the `AUTH_*` variables read by [`AuthConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self {
            auth: AuthConfig::from_env(),
            ..Self::default()
        };

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("TLS_CERT_PATH") {
            config.tls_cert_path = Some(v);
        }
        if let Ok(v) = std::env::var("TLS_KEY_PATH") {
            config.tls_key_path = Some(v);
        }
        if let Ok(v) = std::env::var("KEYS_FILE") {
            config.keys_file = Some(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

//! Ironic client configuration
//!
//! Layered with figment: field defaults, then an optional YAML file, then
//! `IRONIC_*` environment variables (`IRONIC_URL`, `IRONIC_AUTH_TOKEN`,
//! `IRONIC_TIMEOUT_SECS`).
//!
//! The microversion must be a string. YAML reads an unquoted `1.46` as a
//! float (and `1.10` as `1.1`), so numeric values are rejected with a hint to
//! quote them. For the same reason it is not read from the environment here:
//! `IRONIC_API_VERSION` is handled by the CLI instead.

use crate::error::ControllerError;
use figment::error::Kind;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use ironic_client::{IronicClient, DEFAULT_API_VERSION};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Connection settings for the Ironic API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Ironic endpoint, e.g. `http://ironic:6385`
    #[serde(default)]
    pub url: Option<String>,

    /// Keystone token; leave unset for noauth deployments
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Requested API microversion
    #[serde(default = "default_api_version", deserialize_with = "api_version_string")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

const UNQUOTED_API_VERSION: &str = "api_version must be a quoted string";

/// Accept the microversion only as a string
fn api_version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ApiVersionVisitor;

    impl ApiVersionVisitor {
        fn unquoted<E: de::Error>(found: impl fmt::Display) -> E {
            E::custom(format!(
                "{UNQUOTED_API_VERSION} such as \"{DEFAULT_API_VERSION}\", found number {found}"
            ))
        }
    }

    impl Visitor<'_> for ApiVersionVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an API microversion string such as \"1.46\"")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Err(Self::unquoted(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Err(Self::unquoted(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Err(Self::unquoted(value))
        }
    }

    deserializer.deserialize_any(ApiVersionVisitor)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            auth_token: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load from defaults, the optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ControllerError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ControllerError::InvalidConfig(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed("IRONIC_").ignore(&["api_version", "config"])))
    }

    /// Extract and validate a configuration from any figment
    pub fn extract(figment: Figment) -> Result<Self, ControllerError> {
        let config: Self = figment.extract().map_err(|e| {
            if let Kind::Message(msg) = &e.kind {
                if msg.starts_with(UNQUOTED_API_VERSION) {
                    return ControllerError::InvalidConfig(msg.clone());
                }
            }
            ControllerError::Config(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ControllerError> {
        match self.url.as_deref() {
            None | Some("") => Err(ControllerError::InvalidConfig(
                "Ironic endpoint URL is required (set IRONIC_URL or `url` in the config file)"
                    .to_string(),
            )),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                Err(ControllerError::InvalidConfig(format!(
                    "Ironic endpoint URL must be http(s), got '{url}'"
                )))
            }
            Some(_) if self.timeout_secs == 0 => Err(ControllerError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    /// Build a client for the configured endpoint
    pub fn build_client(&self) -> Result<IronicClient, ControllerError> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| ControllerError::InvalidConfig("Ironic endpoint URL is required".to_string()))?;
        let client = IronicClient::new(
            url,
            self.auth_token.clone(),
            Duration::from_secs(self.timeout_secs),
        )?
        .with_api_version(self.api_version.clone());
        Ok(client)
    }
}

//! Connection parameters for a WebHDFS namenode.
//!
//! # Design
//! `Configuration` is plain data with public fields. Callers build one with
//! `Configuration::new()` (or `Default`), adjust fields, and hand it to the
//! endpoint resolver. Nothing is validated here; an empty `address` is only
//! reported when the endpoint is resolved.
//!
//! The struct can also be filled from JSON (`serde`, missing keys take the
//! defaults) or from `WEBHDFS_*` environment variables via `from_env`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Default for both the connect and the response-header timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(17);

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "WEBHDFS_";

/// Connection parameters for one client session.
///
/// `user` is the only field the crate ever writes: resolving the endpoint
/// fills it with the OS process owner when it is empty.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// `host:port` of the namenode HTTP endpoint, without a scheme.
    pub address: String,
    /// Appended verbatim after `/webhdfs/v1`; include the leading slash.
    pub base_path: String,
    /// Value sent as `user.name`.
    pub user: String,
    /// Only used to build the Basic auth header.
    pub password: String,
    #[serde(rename = "connection_timeout_secs", with = "duration_secs")]
    pub connection_timeout: Duration,
    #[serde(rename = "response_header_timeout_secs", with = "duration_secs")]
    pub response_header_timeout: Duration,
    pub disable_keep_alives: bool,
    pub disable_compression: bool,
    pub use_https: bool,
    /// Whether the transport should attach the Basic auth header.
    pub basic_auth: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            address: String::new(),
            base_path: String::new(),
            user: String::new(),
            password: String::new(),
            connection_timeout: DEFAULT_TIMEOUT,
            response_header_timeout: DEFAULT_TIMEOUT,
            disable_keep_alives: false,
            disable_compression: true,
            use_https: true,
            basic_auth: true,
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Configuration")
            .field("address", &self.address)
            .field("base_path", &self.base_path)
            .field("user", &self.user)
            .field("password", &password)
            .field("connection_timeout", &self.connection_timeout)
            .field("response_header_timeout", &self.response_header_timeout)
            .field("disable_keep_alives", &self.disable_keep_alives)
            .field("disable_compression", &self.disable_compression)
            .field("use_https", &self.use_https)
            .field("basic_auth", &self.basic_auth)
            .finish()
    }
}

impl Configuration {
    /// A configuration holding only the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with any `WEBHDFS_*` variables from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values returned by `lookup`, which is asked for
    /// the full variable name (e.g. `WEBHDFS_ADDRESS`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(format!("{ENV_PREFIX}{name}").as_str());
        let mut config = Self::default();

        if let Some(v) = var("ADDRESS") {
            config.address = v;
        }
        if let Some(v) = var("BASE_PATH") {
            config.base_path = v;
        }
        if let Some(v) = var("USER") {
            config.user = v;
        }
        if let Some(v) = var("PASSWORD") {
            config.password = v;
        }
        if let Some(v) = var("CONNECTION_TIMEOUT_SECS") {
            config.connection_timeout = parse_secs("CONNECTION_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("RESPONSE_HEADER_TIMEOUT_SECS") {
            config.response_header_timeout = parse_secs("RESPONSE_HEADER_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("DISABLE_KEEP_ALIVES") {
            config.disable_keep_alives = parse_bool("DISABLE_KEEP_ALIVES", &v)?;
        }
        if let Some(v) = var("DISABLE_COMPRESSION") {
            config.disable_compression = parse_bool("DISABLE_COMPRESSION", &v)?;
        }
        if let Some(v) = var("USE_HTTPS") {
            config.use_https = parse_bool("USE_HTTPS", &v)?;
        }
        if let Some(v) = var("BASIC_AUTH") {
            config.basic_auth = parse_bool("BASIC_AUTH", &v)?;
        }

        Ok(config)
    }
}

fn invalid(name: &str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        key: format!("{ENV_PREFIX}{name}"),
        value: value.to_string(),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(name, value)),
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, ConfigurationError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid(name, value))
}

/// Whole-second (de)serialization for `Duration` fields.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Configuration::new();
        assert_eq!(config.connection_timeout, Duration::from_secs(17));
        assert_eq!(config.response_header_timeout, Duration::from_secs(17));
        assert!(!config.disable_keep_alives);
        assert!(config.disable_compression);
        assert!(config.use_https);
        assert!(config.basic_auth);
        assert!(config.address.is_empty());
        assert!(config.base_path.is_empty());
        assert!(config.user.is_empty());
        assert!(config.password.is_empty());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Configuration =
            serde_json::from_str(r#"{"address":"nn1:50070","use_https":false}"#).unwrap();
        assert_eq!(config.address, "nn1:50070");
        assert!(!config.use_https);
        assert!(config.basic_auth);
        assert_eq!(config.connection_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn timeouts_serialize_as_seconds() {
        let config = Configuration {
            connection_timeout: Duration::from_secs(5),
            ..Configuration::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["connection_timeout_secs"], 5);
        assert_eq!(json["response_header_timeout_secs"], 17);
        assert!(json.get("connection_timeout").is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let config = Configuration {
            user: "alice".to_string(),
            password: "secret".to_string(),
            ..Configuration::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("alice"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn lookup_with_no_variables_yields_defaults() {
        let config = Configuration::from_lookup(|_| None).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn lookup_overrides_every_field() {
        let config = Configuration::from_lookup(lookup_from(&[
            ("WEBHDFS_ADDRESS", "nn1:50070"),
            ("WEBHDFS_BASE_PATH", "/data"),
            ("WEBHDFS_USER", "alice"),
            ("WEBHDFS_PASSWORD", "secret"),
            ("WEBHDFS_CONNECTION_TIMEOUT_SECS", "3"),
            ("WEBHDFS_RESPONSE_HEADER_TIMEOUT_SECS", " 30 "),
            ("WEBHDFS_DISABLE_KEEP_ALIVES", "yes"),
            ("WEBHDFS_DISABLE_COMPRESSION", "FALSE"),
            ("WEBHDFS_USE_HTTPS", "0"),
            ("WEBHDFS_BASIC_AUTH", "no"),
        ]))
        .unwrap();

        assert_eq!(config.address, "nn1:50070");
        assert_eq!(config.base_path, "/data");
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "secret");
        assert_eq!(config.connection_timeout, Duration::from_secs(3));
        assert_eq!(config.response_header_timeout, Duration::from_secs(30));
        assert!(config.disable_keep_alives);
        assert!(!config.disable_compression);
        assert!(!config.use_https);
        assert!(!config.basic_auth);
    }

    #[test]
    fn lookup_rejects_unparseable_bool() {
        let err = Configuration::from_lookup(lookup_from(&[("WEBHDFS_USE_HTTPS", "maybe")]))
            .unwrap_err();
        match err {
            ConfigurationError::InvalidValue { key, value } => {
                assert_eq!(key, "WEBHDFS_USE_HTTPS");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lookup_rejects_negative_timeout() {
        let err = Configuration::from_lookup(lookup_from(&[(
            "WEBHDFS_CONNECTION_TIMEOUT_SECS",
            "-1",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}

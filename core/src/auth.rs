//! HTTP Basic credentials for the namenode.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::config::Configuration;

/// Scheme prefix of the `Authorization` header value.
pub const BASIC_AUTH_PREFIX: &str = "Basic ";

/// `Basic <base64(user:password)>` built from the configuration.
///
/// Reads `user` as it currently is; call this after resolving the endpoint if
/// the user is meant to be defaulted from the host.
pub fn encode_basic_auth_token(config: &Configuration) -> String {
    basic_auth_token(&config.user, &config.password)
}

/// `Basic <base64(user:password)>` with standard, padded Base64. Any input,
/// empty strings included, produces a value.
pub fn basic_auth_token(user: &str, password: &str) -> String {
    let credentials = format!("{user}:{password}");
    format!("{BASIC_AUTH_PREFIX}{}", BASE64_STANDARD.encode(credentials.as_bytes()))
}

/// Split a `Basic ...` header value back into `(user, password)`.
///
/// Returns `None` for other schemes, invalid Base64, non-UTF-8 payloads or a
/// payload without a `:`. The password may itself contain `:`.
pub fn decode_basic_auth_token(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix(BASIC_AUTH_PREFIX)?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (user, password) = credentials.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

impl Configuration {
    /// Shorthand for [`encode_basic_auth_token`].
    pub fn basic_auth_token(&self) -> String {
        encode_basic_auth_token(self)
    }
}

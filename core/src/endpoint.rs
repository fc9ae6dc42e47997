//! Resolution of the namenode base URL.
//!
//! # Design
//! The endpoint is assembled as a string, `scheme://address/webhdfs/v1` plus
//! the verbatim `base_path` and a `user.name` query parameter, and only then
//! handed to the `url` parser. `base_path` is never normalized, so the caller
//! controls its leading slash.
//!
//! When `Configuration::user` is empty the resolver asks a `UserSource` for
//! the process owner and writes the answer back into the configuration. That
//! write is the only mutation this crate performs, which is why the resolver
//! takes `&mut Configuration`. Later resolutions see a non-empty user and
//! leave the configuration untouched.

use tracing::{debug, info, warn};
use url::Url;

use crate::config::Configuration;
use crate::error::ConfigurationError;

/// Protocol version segment placed right after the authority.
pub const WEBHDFS_VERSION_PATH: &str = "/webhdfs/v1";

/// Query parameter carrying the acting user.
pub const USER_NAME_PARAM: &str = "user.name";

/// Source of the identity used when `Configuration::user` is empty.
pub trait UserSource {
    fn current_user(&self) -> Result<String, ConfigurationError>;
}

/// Asks the operating system for the owner of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUser;

impl UserSource for SystemUser {
    fn current_user(&self) -> Result<String, ConfigurationError> {
        whoami::fallible::username().map_err(|e| ConfigurationError::UnknownUser(e.to_string()))
    }
}

/// Always reports the same identity. Useful when the acting user is decided
/// by something other than the host, and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedUser(pub String);

impl UserSource for FixedUser {
    fn current_user(&self) -> Result<String, ConfigurationError> {
        Ok(self.0.clone())
    }
}

/// Resolve the base URL for every WebHDFS call, defaulting `user` from the OS.
///
/// Side effect: if `config.user` is empty it is set to the current process
/// owner before the URL is built. See `resolve_endpoint_with`.
pub fn resolve_endpoint(config: &mut Configuration) -> Result<Url, ConfigurationError> {
    resolve_endpoint_with(config, &SystemUser)
}

/// Resolve the base URL, asking `users` for the identity when `config.user`
/// is empty and storing the answer in `config.user`.
///
/// # Errors
/// - `MissingField` if `address` is empty.
/// - `UnknownUser` if the user has to be defaulted and `users` cannot supply
///   a non-empty name.
/// - `MalformedUrl` if the composed string is not a valid URL.
pub fn resolve_endpoint_with<U>(
    config: &mut Configuration,
    users: &U,
) -> Result<Url, ConfigurationError>
where
    U: UserSource + ?Sized,
{
    if config.address.is_empty() {
        return Err(ConfigurationError::MissingField { field: "address" });
    }

    let scheme = if config.use_https { "https" } else { "http" };
    let mut raw = format!(
        "{scheme}://{}{WEBHDFS_VERSION_PATH}{}",
        config.address, config.base_path
    );

    if config.user.is_empty() {
        let user = users.current_user().inspect_err(|e| {
            warn!(error = %e, "current user lookup failed");
        })?;
        if user.is_empty() {
            return Err(ConfigurationError::UnknownUser(
                "host reported an empty user name".to_string(),
            ));
        }
        info!(user = %user, "defaulting user.name to the current OS user");
        config.user = user;
    }

    raw.push('?');
    raw.push_str(USER_NAME_PARAM);
    raw.push('=');
    raw.push_str(&config.user);

    let url = Url::parse(&raw).map_err(|source| ConfigurationError::MalformedUrl {
        url: raw.clone(),
        source,
    })?;
    debug!(endpoint = %url, "resolved WebHDFS endpoint");
    Ok(url)
}

impl Configuration {
    /// Shorthand for [`resolve_endpoint`]; fills `self.user` when empty.
    pub fn resolve_endpoint(&mut self) -> Result<Url, ConfigurationError> {
        resolve_endpoint(self)
    }
}

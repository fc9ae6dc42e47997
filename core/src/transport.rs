//! What the configuration asks of the HTTP transport.
//!
//! Nothing here is enforced by this crate. The caller's HTTP stack reads
//! `TransportOptions` to size its timeouts and connection reuse, and the
//! request builder turns the same flags into request headers.

use std::time::Duration;

use crate::config::Configuration;

/// Transport-level settings projected out of a `Configuration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub response_header_timeout: Duration,
    pub keep_alive: bool,
    /// Whether compressed responses may be requested.
    pub compression: bool,
    pub attach_basic_auth: bool,
}

impl From<&Configuration> for TransportOptions {
    fn from(config: &Configuration) -> Self {
        Self {
            connect_timeout: config.connection_timeout,
            response_header_timeout: config.response_header_timeout,
            keep_alive: !config.disable_keep_alives,
            compression: !config.disable_compression,
            attach_basic_auth: config.basic_auth,
        }
    }
}

impl TransportOptions {
    /// Headers implied by these options. `basic_token` is attached only when
    /// `attach_basic_auth` is set.
    pub fn headers(&self, basic_token: &str) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if self.attach_basic_auth {
            headers.push(("authorization".to_string(), basic_token.to_string()));
        }
        if !self.compression {
            headers.push(("accept-encoding".to_string(), "identity".to_string()));
        }
        if !self.keep_alive {
            headers.push(("connection".to_string(), "close".to_string()));
        }
        headers
    }
}

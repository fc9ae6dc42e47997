//! Connection configuration for WebHDFS clients.
//!
//! # Overview
//! Holds the parameters needed to talk to a namenode's WebHDFS REST API and
//! derives from them the base URL of every call
//! (`scheme://address/webhdfs/v1<base_path>?user.name=<user>`) and the
//! `Authorization: Basic` header value. Nothing here performs network I/O.
//!
//! # Design
//! - `Configuration` is plain data with the documented defaults.
//! - `resolve_endpoint` takes `&mut Configuration` because an empty `user`
//!   is filled from the OS on first resolution.
//! - `encode_basic_auth_token` is total and deterministic.
//! - `WebHdfsClient` snapshots a resolved configuration and builds
//!   `HttpRequest` values for the caller to execute (host-does-IO).
//! - The crate emits `tracing` events and never installs a subscriber.
//!
//! ```
//! use webhdfs_core::{Configuration, FixedUser, resolve_endpoint_with};
//!
//! let mut config = Configuration::new();
//! config.address = "nn1:50070".to_string();
//! config.base_path = "/data".to_string();
//! config.password = "secret".to_string();
//!
//! let url = resolve_endpoint_with(&mut config, &FixedUser("alice".into())).unwrap();
//! assert_eq!(url.as_str(), "https://nn1:50070/webhdfs/v1/data?user.name=alice");
//! assert_eq!(config.basic_auth_token(), "Basic YWxpY2U6c2VjcmV0");
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;

pub use auth::{basic_auth_token, decode_basic_auth_token, encode_basic_auth_token};
pub use client::WebHdfsClient;
pub use config::Configuration;
pub use endpoint::{
    resolve_endpoint, resolve_endpoint_with, FixedUser, SystemUser, UserSource,
    USER_NAME_PARAM, WEBHDFS_VERSION_PATH,
};
pub use error::{ApiError, ConfigurationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::TransportOptions;
pub use url::Url;

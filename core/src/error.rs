//! Error types for configuration resolution and response parsing.
//!
//! # Design
//! `ConfigurationError` covers everything that can go wrong before a request
//! leaves the process: a missing address, a composed URL the parser rejects,
//! an unknown host user, or an environment override that does not parse.
//! These are programmer/configuration mistakes and are never retried.
//!
//! `ApiError` covers what comes back from the namenode once the caller has
//! executed a request, plus the one request-side failure: a path that would
//! leave the base path. `NotFound` keeps a dedicated variant because callers
//! frequently distinguish "the path does not exist" from other failures.

use thiserror::Error;

/// Errors raised while turning a `Configuration` into an endpoint.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A field the resolver cannot do without was left empty.
    #[error("configuration field `{field}` is required but not set")]
    MissingField { field: &'static str },

    /// The composed endpoint string failed URL validation.
    #[error("malformed endpoint URL `{url}`: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The host could not report the identity of the process owner.
    #[error("cannot determine current user: {0}")]
    UnknownUser(String),

    /// An environment override could not be parsed.
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Errors returned by `WebHdfsClient::build_request` and
/// `WebHdfsClient::parse_response`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request path contains a `.` or `..` segment.
    #[error("path `{0}` must stay below the base path")]
    InvalidPath(String),

    /// The namenode returned 404.
    #[error("resource not found")]
    NotFound,

    /// The namenode returned a WebHDFS `RemoteException` body.
    #[error("{exception} (HTTP {status}): {message}")]
    RemoteException {
        status: u16,
        exception: String,
        message: String,
    },

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not the JSON shape the caller expected.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn malformed_url_exposes_parser_error_as_source() {
        let err = ConfigurationError::MalformedUrl {
            url: "http://nn 1/webhdfs/v1".to_string(),
            source: url::ParseError::InvalidDomainCharacter,
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), url::ParseError::InvalidDomainCharacter.to_string());
        assert!(err.to_string().contains("invalid domain character"));
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = ConfigurationError::MissingField { field: "address" };
        assert_eq!(err.to_string(), "configuration field `address` is required but not set");
        assert!(err.source().is_none());
    }

    #[test]
    fn remote_exception_display() {
        let err = ApiError::RemoteException {
            status: 403,
            exception: "AccessControlException".to_string(),
            message: "Permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "AccessControlException (HTTP 403): Permission denied");
    }

    #[test]
    fn invalid_path_display_quotes_the_path() {
        let err = ApiError::InvalidPath("../etc".to_string());
        assert_eq!(err.to_string(), "path `../etc` must stay below the base path");
    }
}

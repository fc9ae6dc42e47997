//! Stateless request builder and response reader for a WebHDFS namenode.
//!
//! # Design
//! `WebHdfsClient` is built once from a `Configuration`: the endpoint is
//! resolved (filling the user if needed), the Basic credential is encoded and
//! the transport options are captured. After that the client is immutable,
//! so it can be cloned or shared across threads without touching the
//! configuration again.
//!
//! `build_request` produces an `HttpRequest` and `parse_response` consumes an
//! `HttpResponse`. The caller executes the HTTP round-trip in between.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::auth::encode_basic_auth_token;
use crate::config::Configuration;
use crate::endpoint::{resolve_endpoint_with, SystemUser, UserSource};
use crate::error::{ApiError, ConfigurationError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::TransportOptions;

/// Query parameter naming the WebHDFS operation.
pub const OP_PARAM: &str = "op";

/// Resolved, immutable view of a `Configuration` that builds WebHDFS requests
/// and reads their responses.
#[derive(Clone)]
pub struct WebHdfsClient {
    base_url: Url,
    user: String,
    auth_token: String,
    transport: TransportOptions,
}

impl fmt::Debug for WebHdfsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHdfsClient")
            .field("base_url", &self.base_url.as_str())
            .field("user", &self.user)
            .field("auth_token", &"<redacted>")
            .field("transport", &self.transport)
            .finish()
    }
}

impl WebHdfsClient {
    /// Resolve `config` against the OS user and snapshot it.
    pub fn new(config: &mut Configuration) -> Result<Self, ConfigurationError> {
        Self::with_user_source(config, &SystemUser)
    }

    /// Like `new`, with the identity for an empty `user` taken from `users`.
    pub fn with_user_source<U>(
        config: &mut Configuration,
        users: &U,
    ) -> Result<Self, ConfigurationError>
    where
        U: UserSource + ?Sized,
    {
        let base_url = resolve_endpoint_with(config, users)?;
        Ok(Self {
            base_url,
            user: config.user.clone(),
            auth_token: encode_basic_auth_token(config),
            transport: TransportOptions::from(&*config),
        })
    }

    /// Resolved endpoint, `user.name` included.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Effective `user.name`.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Transport settings captured from the configuration.
    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }

    /// Build a request for `op` on `path`, relative to the configured base
    /// path. `params` are appended after `op`, form-encoded.
    ///
    /// Each segment of `path` is percent-encoded, so the result always stays
    /// below the base path.
    ///
    /// # Errors
    /// `ApiError::InvalidPath` if `path` has a `.` or `..` segment.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        op: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let segments = path_segments(path)?;
        let mut url = self.base_url.clone();
        if !segments.is_empty() {
            let mut base = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidPath(path.to_string()))?;
            base.pop_if_empty().extend(segments);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(OP_PARAM, op);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: self.transport.headers(&self.auth_token),
            body: None,
        })
    }

    /// Return the body of a 2xx response, or classify the failure.
    pub fn parse_response(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    /// Like `parse_response`, then deserialize the JSON body.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let body = self.parse_response(response)?;
        serde_json::from_str(&body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

#[derive(Deserialize)]
struct RemoteExceptionEnvelope {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Deserialize)]
struct RemoteException {
    exception: String,
    #[serde(default)]
    message: String,
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    if let Ok(envelope) = serde_json::from_str::<RemoteExceptionEnvelope>(&response.body) {
        return Err(ApiError::RemoteException {
            status: response.status,
            exception: envelope.remote_exception.exception,
            message: envelope.remote_exception.message,
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Split `path` into non-empty segments, rejecting dot segments.
fn path_segments(path: &str) -> Result<Vec<&str>, ApiError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(ApiError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::FixedUser;

    fn config() -> Configuration {
        Configuration {
            address: "nn1:50070".to_string(),
            base_path: "/data".to_string(),
            use_https: false,
            password: "secret".to_string(),
            ..Configuration::default()
        }
    }

    fn client() -> WebHdfsClient {
        WebHdfsClient::with_user_source(&mut config(), &FixedUser("alice".to_string())).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn construction_fills_user_and_snapshots() {
        let mut c = config();
        let client = WebHdfsClient::with_user_source(&mut c, &FixedUser("alice".to_string())).unwrap();
        assert_eq!(c.user, "alice");
        assert_eq!(client.user(), "alice");
        assert_eq!(client.base_url().as_str(), "http://nn1:50070/webhdfs/v1/data?user.name=alice");
        assert_eq!(client.transport(), &TransportOptions::from(&c));
    }

    #[test]
    fn construction_propagates_configuration_errors() {
        let mut c = Configuration::default();
        let err = WebHdfsClient::with_user_source(&mut c, &FixedUser("alice".to_string())).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingField { .. }));
    }

    #[test]
    fn build_request_joins_path_and_appends_op() {
        let req = client()
            .build_request(HttpMethod::Get, "/reports/q1.csv", "GETFILESTATUS", &[])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://nn1:50070/webhdfs/v1/data/reports/q1.csv?user.name=alice&op=GETFILESTATUS"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_request_on_base_path_itself() {
        let req = client().build_request(HttpMethod::Get, "", "LISTSTATUS", &[]).unwrap();
        assert_eq!(req.url, "http://nn1:50070/webhdfs/v1/data?user.name=alice&op=LISTSTATUS");
    }

    #[test]
    fn build_request_rejects_dot_segments() {
        let client = client();
        for path in ["../../../etc", "..", "reports/../../x", "./q1.csv", "/a/./b"] {
            let err = client
                .build_request(HttpMethod::Delete, path, "DELETE", &[])
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidPath(ref p) if p == path), "{path}");
        }
    }

    #[test]
    fn build_request_keeps_encoded_dots_below_base_path() {
        let req = client()
            .build_request(HttpMethod::Delete, "%2e%2e/%2E%2E/etc", "DELETE", &[])
            .unwrap();
        assert_eq!(
            req.url,
            "http://nn1:50070/webhdfs/v1/data/%252e%252e/%252E%252E/etc?user.name=alice&op=DELETE"
        );
    }

    #[test]
    fn build_request_allows_dots_inside_names() {
        let req = client()
            .build_request(HttpMethod::Get, ".hidden/...", "GETFILESTATUS", &[])
            .unwrap();
        assert_eq!(
            req.url,
            "http://nn1:50070/webhdfs/v1/data/.hidden/...?user.name=alice&op=GETFILESTATUS"
        );
    }

    #[test]
    fn build_request_under_trailing_slash_base_path() {
        let mut c = Configuration {
            base_path: "/data/".to_string(),
            ..config()
        };
        let client = WebHdfsClient::with_user_source(&mut c, &FixedUser("alice".to_string())).unwrap();
        let req = client.build_request(HttpMethod::Get, "q1.csv", "OPEN", &[]).unwrap();
        assert_eq!(req.url, "http://nn1:50070/webhdfs/v1/data/q1.csv?user.name=alice&op=OPEN");
    }

    #[test]
    fn build_request_encodes_extra_params() {
        let req = client().build_request(
            HttpMethod::Put,
            "tmp",
            "RENAME",
            &[("destination", "/data/new name")],
        )
        .unwrap();
        assert_eq!(
            req.url,
            "http://nn1:50070/webhdfs/v1/data/tmp?user.name=alice&op=RENAME&destination=%2Fdata%2Fnew+name"
        );
    }

    #[test]
    fn build_request_attaches_transport_headers() {
        let req = client().build_request(HttpMethod::Get, "/", "GETHOMEDIRECTORY", &[]).unwrap();
        assert_eq!(req.header("authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
        assert_eq!(req.header("accept-encoding"), Some("identity"));
        assert_eq!(req.header("connection"), None);
    }

    #[test]
    fn build_request_without_basic_auth() {
        let mut c = Configuration {
            basic_auth: false,
            ..config()
        };
        let client = WebHdfsClient::with_user_source(&mut c, &FixedUser("alice".to_string())).unwrap();
        let req = client.build_request(HttpMethod::Get, "/", "GETHOMEDIRECTORY", &[]).unwrap();
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn parse_response_success() {
        let body = client().parse_response(response(200, r#"{"Path":"/user/alice"}"#)).unwrap();
        assert_eq!(body, r#"{"Path":"/user/alice"}"#);
    }

    #[test]
    fn parse_response_not_found() {
        let err = client()
            .parse_response(response(
                404,
                r#"{"RemoteException":{"exception":"FileNotFoundException","javaClassName":"java.io.FileNotFoundException","message":"File does not exist: /x"}}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_response_remote_exception() {
        let err = client()
            .parse_response(response(
                401,
                r#"{"RemoteException":{"exception":"SecurityException","javaClassName":"java.lang.SecurityException","message":"Failed to obtain user group information"}}"#,
            ))
            .unwrap_err();
        match err {
            ApiError::RemoteException { status, exception, message } => {
                assert_eq!(status, 401);
                assert_eq!(exception, "SecurityException");
                assert_eq!(message, "Failed to obtain user group information");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_response_plain_error() {
        let err = client().parse_response(response(502, "bad gateway")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 502, .. }));
    }

    #[test]
    fn parse_json_bad_body() {
        #[derive(Debug, Deserialize)]
        struct Home {
            #[serde(rename = "Path")]
            _path: String,
        }
        let err = client().parse_json::<Home>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn client_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebHdfsClient>();

        let client = client();
        let url = std::thread::spawn(move || client.base_url().to_string()).join().unwrap();
        assert_eq!(url, "http://nn1:50070/webhdfs/v1/data?user.name=alice");
    }

    #[test]
    fn debug_hides_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("YWxpY2U6c2VjcmV0"));
        assert!(debug.contains("alice"));
    }
}

//! In-memory stand-in for a namenode's WebHDFS endpoint.
//!
//! Serves `GET /webhdfs/v1/...` and answers a small set of read-only
//! operations the way a real namenode does, including its
//! `RemoteException` error bodies. It checks the `user.name` parameter and,
//! when configured with credentials, the `Authorization: Basic` header.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, warn};

/// Route prefix every WebHDFS call lives under.
pub const WEBHDFS_PREFIX: &str = "/webhdfs/v1";

/// `FileStatus` object as returned by `GETFILESTATUS`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub length: u64,
    pub owner: String,
    pub group: String,
    pub permission: String,
    pub replication: u16,
}

impl FileStatus {
    pub fn file(owner: &str, length: u64) -> Self {
        Self {
            path_suffix: String::new(),
            kind: "FILE".to_string(),
            length,
            owner: owner.to_string(),
            group: "supergroup".to_string(),
            permission: "644".to_string(),
            replication: 3,
        }
    }

    pub fn directory(owner: &str) -> Self {
        Self {
            path_suffix: String::new(),
            kind: "DIRECTORY".to_string(),
            length: 0,
            owner: owner.to_string(),
            group: "supergroup".to_string(),
            permission: "755".to_string(),
            replication: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Namenode state: the accepted credentials (if any) and the known paths.
#[derive(Clone, Debug, Default)]
pub struct Namenode {
    credentials: Option<Credentials>,
    files: HashMap<String, FileStatus>,
}

impl Namenode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `Authorization: Basic` with exactly these credentials.
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            user: user.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Register `path` (absolute, below `/webhdfs/v1`) for `GETFILESTATUS`.
    pub fn with_file(mut self, path: &str, status: FileStatus) -> Self {
        self.files.insert(path.to_string(), status);
        self
    }
}

pub fn app(namenode: Namenode) -> Router {
    Router::new()
        .route(WEBHDFS_PREFIX, get(root_op))
        .route("/webhdfs/v1/", get(root_op))
        .route("/webhdfs/v1/{*path}", get(path_op))
        .with_state(Arc::new(namenode))
}

pub async fn run(listener: TcpListener, namenode: Namenode) -> Result<(), std::io::Error> {
    axum::serve(listener, app(namenode)).await
}

async fn root_op(
    State(nn): State<Arc<Namenode>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    dispatch(&nn, "/".to_string(), &params, &headers)
}

async fn path_op(
    State(nn): State<Arc<Namenode>>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    dispatch(&nn, format!("/{path}"), &params, &headers)
}

fn dispatch(
    nn: &Namenode,
    path: String,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
) -> Response {
    let op = params.get("op").map(String::as_str).unwrap_or_default();
    debug!(op, path = %path, "webhdfs request");

    let user = match params.get("user.name") {
        Some(user) if !user.is_empty() => user,
        _ => {
            return remote_exception(
                StatusCode::UNAUTHORIZED,
                "SecurityException",
                "java.lang.SecurityException",
                "Failed to obtain user group information: user.name is missing",
            )
        }
    };

    if let Some(expected) = &nn.credentials {
        let supplied = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(decode_basic);
        if supplied.as_ref() != Some(expected) {
            warn!(user = %user, "rejected basic credentials");
            return remote_exception(
                StatusCode::UNAUTHORIZED,
                "AuthenticationException",
                "org.apache.hadoop.security.authentication.client.AuthenticationException",
                "Invalid basic authentication credentials",
            );
        }
    }

    match op.to_ascii_uppercase().as_str() {
        "GETHOMEDIRECTORY" => {
            (StatusCode::OK, Json(json!({ "Path": format!("/user/{user}") }))).into_response()
        }
        "GETFILESTATUS" => match nn.files.get(&path) {
            Some(status) => (StatusCode::OK, Json(json!({ "FileStatus": status }))).into_response(),
            None => remote_exception(
                StatusCode::NOT_FOUND,
                "FileNotFoundException",
                "java.io.FileNotFoundException",
                &format!("File does not exist: {path}"),
            ),
        },
        _ => remote_exception(
            StatusCode::BAD_REQUEST,
            "IllegalArgumentException",
            "java.lang.IllegalArgumentException",
            &format!("Invalid value for webhdfs parameter \"op\": {op}"),
        ),
    }
}

fn decode_basic(value: &str) -> Option<Credentials> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64_STANDARD.decode(encoded).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some(Credentials {
        user: user.to_string(),
        password: password.to_string(),
    })
}

fn remote_exception(status: StatusCode, exception: &str, java_class: &str, message: &str) -> Response {
    let body = json!({
        "RemoteException": {
            "exception": exception,
            "javaClassName": java_class,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

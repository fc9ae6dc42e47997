//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use webhdfs_core::error::ConfigurationError;
use webhdfs_core::http::HttpMethod;

/// Opaque handle to a `Configuration`. C callers mutate it through the
/// `webhdfs_config_set_*` functions.
pub struct FfiConfig {
    pub(crate) inner: webhdfs_core::Configuration,
}

/// Opaque handle to a resolved `WebHdfsClient`.
pub struct FfiClient {
    pub(crate) inner: webhdfs_core::WebHdfsClient,
}

/// Move `s` into a C string owned by the caller. Interior NULs yield an
/// empty string.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `webhdfs_build_request`. The C caller executes the request with
/// its own HTTP stack and frees it with `webhdfs_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: webhdfs_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in the result envelopes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingField = 1,
    MalformedUrl = 2,
    UnknownUser = 3,
    InvalidValue = 4,
    Panic = 5,
    NullArg = 6,
}

impl From<&ConfigurationError> for FfiErrorCode {
    fn from(err: &ConfigurationError) -> Self {
        match err {
            ConfigurationError::MissingField { .. } => FfiErrorCode::MissingField,
            ConfigurationError::MalformedUrl { .. } => FfiErrorCode::MalformedUrl,
            ConfigurationError::UnknownUser(_) => FfiErrorCode::UnknownUser,
            ConfigurationError::InvalidValue { .. } => FfiErrorCode::InvalidValue,
        }
    }
}

/// Result envelope for endpoint resolution.
///
/// On success `error_code` is `Ok`, `error_message` is null and `url` holds
/// the resolved endpoint. On failure `error_code` describes the category,
/// `error_message` is a human-readable C string and `url` is null.
#[repr(C)]
pub struct FfiEndpointResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub url: *mut c_char,
}

impl FfiEndpointResult {
    pub(crate) fn ok(url: String) -> *mut Self {
        Box::into_raw(Box::new(FfiEndpointResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            url: into_c_string(url),
        }))
    }

    pub(crate) fn from_error(err: ConfigurationError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiEndpointResult {
            error_code,
            error_message: into_c_string(msg),
            url: std::ptr::null_mut(),
        }))
    }
}

/// Result envelope for `webhdfs_config_from_env`.
///
/// On success `config` is a handle the caller now owns (release it with
/// `webhdfs_config_free`). On failure `config` is null and `error_message`
/// names the offending variable and value. Free the envelope itself with
/// `webhdfs_free_config_result`; that never frees `config`.
#[repr(C)]
pub struct FfiConfigResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub config: *mut FfiConfig,
}

impl FfiConfigResult {
    pub(crate) fn ok(inner: webhdfs_core::Configuration) -> *mut Self {
        Box::into_raw(Box::new(FfiConfigResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            config: Box::into_raw(Box::new(FfiConfig { inner })),
        }))
    }

    pub(crate) fn from_error(err: ConfigurationError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiConfigResult {
            error_code,
            error_message: into_c_string(msg),
            config: std::ptr::null_mut(),
        }))
    }
}

/// Result envelope for `webhdfs_client_new`.
///
/// On success `client` is a handle the caller now owns (release it with
/// `webhdfs_client_free`). On failure `client` is null and `error_message`
/// holds the resolution error. Free the envelope itself with
/// `webhdfs_free_client_result`; that never frees `client`.
#[repr(C)]
pub struct FfiClientResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub client: *mut FfiClient,
}

impl FfiClientResult {
    pub(crate) fn ok(inner: webhdfs_core::WebHdfsClient) -> *mut Self {
        Box::into_raw(Box::new(FfiClientResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            client: Box::into_raw(Box::new(FfiClient { inner })),
        }))
    }

    pub(crate) fn from_error(err: ConfigurationError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiClientResult {
            error_code,
            error_message: into_c_string(msg),
            client: std::ptr::null_mut(),
        }))
    }
}

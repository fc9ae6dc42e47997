//! C-ABI wrapper around `webhdfs-core`.
//!
//! # Overview
//! Lets any language with a C FFI fill in a WebHDFS connection
//! configuration, resolve its endpoint URL, obtain the Basic auth header
//! value and build requests, without linking to Rust directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Configuration and client are opaque heap handles. Resolution may write
//!   the defaulted user back into the configuration handle, exactly as the
//!   core does.
//! - The C caller owns all returned pointers and must call the matching
//!   `webhdfs_*_free` / `webhdfs_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::time::Duration;

use webhdfs_core::{Configuration, WebHdfsClient};

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Apply `apply` to the configuration behind `config`. Returns `false` if
/// `config` is null or a panic was caught.
fn with_config<F>(config: *mut FfiConfig, apply: F) -> bool
where
    F: FnOnce(&mut Configuration) + std::panic::UnwindSafe,
{
    if config.is_null() {
        return false;
    }
    catch_unwind(|| {
        let config = unsafe { &mut *config };
        apply(&mut config.inner);
        true
    })
    .unwrap_or(false)
}

/// Store a string field. Returns `false` if either pointer is null or the
/// value is not valid UTF-8.
fn set_string<F>(config: *mut FfiConfig, value: *const c_char, apply: F) -> bool
where
    F: FnOnce(&mut Configuration, String) + std::panic::UnwindSafe,
{
    match read_str(value) {
        Some(value) => {
            let value = value.to_string();
            with_config(config, move |c| apply(c, value))
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Configuration lifecycle
// ---------------------------------------------------------------------------

/// Create a configuration holding the defaults.
///
/// The caller must free the returned pointer with `webhdfs_config_free`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_new() -> *mut FfiConfig {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiConfig {
            inner: Configuration::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a configuration from the defaults and `WEBHDFS_*` environment
/// variables.
///
/// A variable holding an unparseable value yields `InvalidValue` with the
/// variable and value in the message. Free the envelope with
/// `webhdfs_free_config_result` and the handle with `webhdfs_config_free`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_from_env() -> *mut FfiConfigResult {
    config_from_lookup(|key| std::env::var(key).ok())
}

fn config_from_lookup<F>(lookup: F) -> *mut FfiConfigResult
where
    F: Fn(&str) -> Option<String> + std::panic::UnwindSafe,
{
    catch_unwind(|| match Configuration::from_lookup(lookup) {
        Ok(inner) => FfiConfigResult::ok(inner),
        Err(e) => FfiConfigResult::from_error(e),
    })
    .unwrap_or_else(|_| FfiConfigResult::panic("panic in webhdfs_config_from_env"))
}

/// Free a configuration. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_free(config: *mut FfiConfig) {
    if !config.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(config) });
        });
    }
}

// ---------------------------------------------------------------------------
// Configuration setters
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_address(config: *mut FfiConfig, address: *const c_char) -> bool {
    set_string(config, address, |c, v| c.address = v)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_base_path(config: *mut FfiConfig, base_path: *const c_char) -> bool {
    set_string(config, base_path, |c, v| c.base_path = v)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_user(config: *mut FfiConfig, user: *const c_char) -> bool {
    set_string(config, user, |c, v| c.user = v)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_password(config: *mut FfiConfig, password: *const c_char) -> bool {
    set_string(config, password, |c, v| c.password = v)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_connection_timeout_ms(config: *mut FfiConfig, millis: u64) -> bool {
    with_config(config, |c| c.connection_timeout = Duration::from_millis(millis))
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_response_header_timeout_ms(
    config: *mut FfiConfig,
    millis: u64,
) -> bool {
    with_config(config, |c| c.response_header_timeout = Duration::from_millis(millis))
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_disable_keep_alives(config: *mut FfiConfig, value: bool) -> bool {
    with_config(config, |c| c.disable_keep_alives = value)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_disable_compression(config: *mut FfiConfig, value: bool) -> bool {
    with_config(config, |c| c.disable_compression = value)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_use_https(config: *mut FfiConfig, value: bool) -> bool {
    with_config(config, |c| c.use_https = value)
}

#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_set_basic_auth(config: *mut FfiConfig, value: bool) -> bool {
    with_config(config, |c| c.basic_auth = value)
}

/// Current value of the `user` field (empty until set or defaulted).
///
/// Returns null if `config` is null. Free with `webhdfs_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_config_user(config: *const FfiConfig) -> *mut c_char {
    catch_unwind(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let config = unsafe { &*config };
        into_c_string(config.inner.user.clone())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Endpoint and credentials
// ---------------------------------------------------------------------------

/// Resolve the base URL for the configuration.
///
/// If the configured user is empty it is replaced by the current OS user,
/// and that change is visible through `webhdfs_config_user` afterwards.
/// Free the result with `webhdfs_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_resolve_endpoint(config: *mut FfiConfig) -> *mut FfiEndpointResult {
    catch_unwind(|| {
        if config.is_null() {
            return FfiEndpointResult::null_arg("config");
        }
        let config = unsafe { &mut *config };
        match config.inner.resolve_endpoint() {
            Ok(url) => FfiEndpointResult::ok(url.into()),
            Err(e) => FfiEndpointResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiEndpointResult::panic("panic in webhdfs_resolve_endpoint"))
}

/// `Basic <base64(user:password)>` for the configuration as it is now.
///
/// Returns null if `config` is null. Free with `webhdfs_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_basic_auth_token(config: *const FfiConfig) -> *mut c_char {
    catch_unwind(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let config = unsafe { &*config };
        into_c_string(config.inner.basic_auth_token())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Resolve `config` and snapshot it into a client.
///
/// Resolution errors come back in the envelope with the same codes as
/// `webhdfs_resolve_endpoint`. Free the envelope with
/// `webhdfs_free_client_result` and the handle with `webhdfs_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_client_new(config: *mut FfiConfig) -> *mut FfiClientResult {
    catch_unwind(|| {
        if config.is_null() {
            return FfiClientResult::null_arg("config");
        }
        let config = unsafe { &mut *config };
        match WebHdfsClient::new(&mut config.inner) {
            Ok(inner) => FfiClientResult::ok(inner),
            Err(e) => FfiClientResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiClientResult::panic("panic in webhdfs_client_new"))
}

/// Free a client. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Build a request for `op` on `path` (relative to the base path).
///
/// `path` may be null, meaning the base path itself. Returns null if
/// `client` or `op` is null, if `op` or a non-null `path` is not valid
/// UTF-8, or if `path` has a `.` or `..` segment. Free with
/// `webhdfs_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_build_request(
    client: *const FfiClient,
    method: FfiHttpMethod,
    path: *const c_char,
    op: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(op) = read_str(op) else {
            return std::ptr::null_mut();
        };
        let path = if path.is_null() {
            ""
        } else {
            match read_str(path) {
                Some(path) => path,
                None => return std::ptr::null_mut(),
            }
        };
        let client = unsafe { &*client };
        match client.inner.build_request(method.into(), path, op, &[]) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `webhdfs_build_request`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free a result returned by `webhdfs_resolve_endpoint`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_free_result(result: *mut FfiEndpointResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.url.is_null() {
            drop(unsafe { CString::from_raw(result.url) });
        }
    });
}

/// Free an envelope returned by `webhdfs_config_from_env`. The configuration
/// handle it carries is left alone. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_free_config_result(result: *mut FfiConfigResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
    });
}

/// Free an envelope returned by `webhdfs_client_new`. The client handle it
/// carries is left alone. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_free_client_result(result: *mut FfiClientResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
    });
}

/// Free a string returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webhdfs_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

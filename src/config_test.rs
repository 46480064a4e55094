use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch the process environment.
fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_lock`].
unsafe fn clear_backend_env() {
    unsafe {
        std::env::remove_var("CURVETOPIA_BACKEND_URL");
        std::env::remove_var("CURVETOPIA_POLYLINE_PATH");
        std::env::remove_var("CURVETOPIA_DRAWING_PATH");
        std::env::remove_var("CURVETOPIA_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CURVETOPIA_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_lock();
    unsafe { clear_backend_env() };

    let cfg = BackendConfig::from_env().unwrap();
    assert_eq!(cfg, BackendConfig::default());
    assert_eq!(cfg.polyline_url(), "http://127.0.0.1:8000/api/polylines/");
    assert_eq!(cfg.drawing_url(), "http://127.0.0.1:8000/api/drawings/");
    assert_eq!(
        cfg.timeouts,
        BackendTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_backend_env();
        std::env::set_var("CURVETOPIA_BACKEND_URL", "https://beautify.example.test/");
        std::env::set_var("CURVETOPIA_POLYLINE_PATH", "v2/polylines");
        std::env::set_var("CURVETOPIA_DRAWING_PATH", "/v2/doodles/");
        std::env::set_var("CURVETOPIA_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("CURVETOPIA_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = BackendConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://beautify.example.test");
    assert_eq!(cfg.polyline_url(), "https://beautify.example.test/v2/polylines");
    assert_eq!(cfg.drawing_url(), "https://beautify.example.test/v2/doodles/");
    assert_eq!(cfg.timeouts, BackendTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_backend_env() };
}

#[test]
fn from_env_bad_timeout_falls_back_to_default() {
    let _guard = env_lock();
    unsafe {
        clear_backend_env();
        std::env::set_var("CURVETOPIA_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = BackendConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_backend_env() };
}

#[test]
fn from_env_rejects_non_http_url() {
    let _guard = env_lock();
    unsafe {
        clear_backend_env();
        std::env::set_var("CURVETOPIA_BACKEND_URL", "ftp://files.example.test");
    }

    let err = BackendConfig::from_env().unwrap_err();
    assert!(matches!(err, BackendError::ConfigParse(_)));
    assert!(err.to_string().contains("must start with http"));

    unsafe { clear_backend_env() };
}

#[test]
fn with_base_url_keeps_default_paths() {
    let cfg = BackendConfig::with_base_url("http://localhost:9000/").unwrap();
    assert_eq!(cfg.drawing_url(), "http://localhost:9000/api/drawings/");
    assert!(BackendConfig::with_base_url("localhost:9000").is_err());
}

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::util::{non_empty_env, parse_bool_str};

const LOG_FILTER_ENV: &str = "CFOR_LOG";
const LOG_PATH_ENV: &str = "CFOR_LOG_PATH";
const DEBUG_PAYLOAD_ENV: &str = "CFOR_DEBUG_PAYLOAD";
const DEFAULT_LOG_FILE: &str = "cfor.log";

/// Installs a file-backed subscriber when `CFOR_LOG` is set. The terminal
/// itself is never a log sink because injected keystrokes share it.
pub fn init() -> Result<()> {
    let Some(filter) = non_empty_env(LOG_FILTER_ENV) else {
        return Ok(());
    };

    let path = resolve_log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to install logger: {error}"))?;

    Ok(())
}

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(|v| parse_bool_str(&v))
        .unwrap_or(false)
}

pub fn emit_debug_payload(request_url: &str, payload: &Value) {
    let formatted_payload = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    tracing::debug!(url = request_url, "request payload\n{formatted_payload}");
}

fn resolve_log_path() -> PathBuf {
    non_empty_env(LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_payload_enabled_accepts_true_variants() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::set_var(DEBUG_PAYLOAD_ENV, "1");
        assert!(debug_payload_enabled());
        std::env::set_var(DEBUG_PAYLOAD_ENV, "TRUE");
        assert!(debug_payload_enabled());
        std::env::set_var(DEBUG_PAYLOAD_ENV, "nope");
        assert!(!debug_payload_enabled());
        std::env::remove_var(DEBUG_PAYLOAD_ENV);
        assert!(!debug_payload_enabled());
    }

    #[test]
    fn test_resolve_log_path_uses_override() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::set_var(LOG_PATH_ENV, "/tmp/cfor-test.log");
        assert_eq!(resolve_log_path(), PathBuf::from("/tmp/cfor-test.log"));
        std::env::remove_var(LOG_PATH_ENV);
        assert_eq!(
            resolve_log_path(),
            std::env::temp_dir().join(DEFAULT_LOG_FILE)
        );
    }

    #[test]
    fn test_init_is_noop_without_filter() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::remove_var(LOG_FILTER_ENV);
        assert!(init().is_ok());
    }
}

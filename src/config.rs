use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the inference service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Read `STRESS_API_BASE_URL` and `STRESS_API_TIMEOUT_SECS`, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url = env::var("STRESS_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = env::var("STRESS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        ServiceConfig {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

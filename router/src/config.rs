//! Router and lifecycle configuration

use std::time::Duration;
use url::Url;

use crate::error::{RouterError, RouterResult};

pub const DEFAULT_REGISTRY_URL: &str = "http://127.0.0.1:8848";

/// How the router reaches and polls the registry
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub registry_url: Url,
    pub request_timeout: Duration,
    pub ready_timeout: Duration,
    pub ready_retry_interval: Duration,
    pub refresh_interval: Duration,
}

impl RouterConfig {
    /// Parse the registry base URL and keep the remaining defaults
    pub fn new(registry_url: &str) -> RouterResult<Self> {
        let registry_url = Url::parse(registry_url)?;
        if !matches!(registry_url.scheme(), "http" | "https") {
            return Err(RouterError::ConfigurationError {
                field: format!("registry_url scheme '{}'", registry_url.scheme()),
            });
        }

        Ok(Self {
            registry_url,
            request_timeout: Duration::from_secs(5),
            ready_timeout: Duration::from_secs(10),
            ready_retry_interval: Duration::from_millis(500),
            refresh_interval: Duration::from_secs(30),
        })
    }
}

/// Timing of the fatal and drain paths
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Delay between the fatal log line and process exit
    pub grace_period: Duration,
    /// Upper bound on waiting for supervised work while draining
    pub drain_timeout: Duration,
    /// Install the process panic hook on start
    pub trap_panics: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(100),
            drain_timeout: Duration::from_secs(5),
            trap_panics: true,
        }
    }
}

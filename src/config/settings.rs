use std::path::PathBuf;
use std::time::Duration;

use super::cli::Cli;
use crate::error::ReplayError;
use crate::okapi::Credentials;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Rollover log to scan
    pub log_path: PathBuf,
    /// Okapi base URL without trailing slash
    pub base_url: String,
    /// Tenant sent with every request
    pub tenant: String,
    pub credentials: Credentials,
    /// Upper bound for each HTTP request (None = wait forever)
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ReplayError> {
        let host = cli.okapi_host.trim();
        if host.is_empty() {
            return Err(ReplayError::Config("OKAPI_HOST is empty".to_string()));
        }
        let tenant = cli.okapi_tenant.trim();
        if tenant.is_empty() {
            return Err(ReplayError::Config("OKAPI_TENANT is empty".to_string()));
        }
        if cli.order_logs.as_os_str().is_empty() {
            return Err(ReplayError::Config("ORDER_LOGS is empty".to_string()));
        }

        Ok(Self {
            log_path: cli.order_logs,
            base_url: base_url_for_host(host),
            tenant: tenant.to_string(),
            credentials: Credentials::new(cli.okapi_username, cli.okapi_password),
            request_timeout: (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs)),
        })
    }
}

/// Okapi is reached over TLS on 443 unless the host already names a scheme.
pub fn base_url_for_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

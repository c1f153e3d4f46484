use std::path::PathBuf;

use clap::Parser;

use super::settings::DEFAULT_TIMEOUT_SECS;

/// Replay failed PO line updates recorded in a rollover log.
///
/// Every option is normally supplied through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "rollover-replay", version, about)]
pub struct Cli {
    /// Path to the rollover log to scan
    #[arg(long, env = "ORDER_LOGS")]
    pub order_logs: PathBuf,

    /// Okapi hostname (https, port 443), or a full base URL
    #[arg(long, env = "OKAPI_HOST")]
    pub okapi_host: String,

    /// Tenant sent as x-okapi-tenant on every request
    #[arg(long, env = "OKAPI_TENANT")]
    pub okapi_tenant: String,

    #[arg(long, env = "OKAPI_USERNAME")]
    pub okapi_username: String,

    #[arg(long, env = "OKAPI_PASSWORD", hide_env_values = true)]
    pub okapi_password: String,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long = "timeout-secs", env = "OKAPI_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

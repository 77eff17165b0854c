//! Command-line configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use users_core::client::{DEFAULT_BASE_URL, DEFAULT_RESOURCE};
use users_core::{Confirm, Dashboard, Shell, UsersApi, UsersClient};

use crate::transport::UreqTransport;

#[derive(Debug, Clone, Parser)]
#[command(name = "users-dashboard", version, about = "Manage users held by a REST resource")]
pub struct Cli {
    /// Server root, without the resource name.
    #[arg(long, env = "USERS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Name of the users collection under the base URL.
    #[arg(long, env = "USERS_API_RESOURCE", default_value = DEFAULT_RESOURCE)]
    pub resource: String,

    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, env = "USERS_API_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Path to open after the initial load, e.g. `/user/3`.
    #[arg(long)]
    pub open: Option<String>,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn client(&self) -> Result<UsersClient> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("base URL must start with http:// or https:// (got: {})", self.base_url);
        }
        Ok(UsersClient::with_resource(&self.base_url, &self.resource))
    }

    /// Wire the shell against the configured resource.
    pub fn build_shell(&self, confirm: Arc<dyn Confirm>) -> Result<Shell> {
        let transport = Arc::new(UreqTransport::new(self.timeout()));
        let api = UsersApi::new(self.client()?, transport);
        Ok(Shell::new(Dashboard::new(api, confirm)))
    }
}

pub fn setup_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}

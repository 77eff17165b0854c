use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use users_dashboard::config::setup_tracing;
use users_dashboard::{repl, Cli, Console};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level);

    let console = Arc::new(Console::stdio());
    let mut shell = cli.build_shell(console.clone())?;
    info!(base_url = %cli.base_url, resource = %cli.resource, "Starting dashboard");
    repl::run(&mut shell, &console, cli.open.as_deref()).await
}

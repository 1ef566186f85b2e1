use anyhow::Context;
use clap::Parser;

use stap_tasks::channels::StdioChannel;
use stap_tasks::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the host protocol; logs go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed;
    let mut task = cli.into_task().context("invalid task configuration")?;
    tracing::info!(task = task.name(), ?seed, "starting task");

    let mut channel = StdioChannel::stdio();
    let outcome = task
        .run(&mut channel)
        .await
        .with_context(|| format!("task {} failed", task.name()))?;

    tracing::debug!(?outcome, "task complete");
    Ok(())
}

mod generate;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "salesdash")]
#[command(about = "Builds the sales dashboard from the Notion prospects database")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch prospects, compute KPIs and write the HTML dashboard (default)
    Generate {
        /// Output file; overrides `SALESDASH_OUTPUT_PATH`
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the computed KPIs as JSON without writing a file
    Summary,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = salesdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        database_id = %config.notion_database_id,
        api_key = %config.masked_api_key(),
        base_url = %config.notion_base_url,
        "configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Generate { out: None }) {
        Commands::Generate { out } => generate::run_generate(&config, out.as_deref()).await,
        Commands::Summary => generate::run_summary(&config).await,
    }
}

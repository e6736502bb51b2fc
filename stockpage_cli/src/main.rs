mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockpage_lib::AppConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockpage")]
#[command(about = "Publish a quote page for a TWSE/TPEx watchlist")]
struct Cli {
    /// Watchlist YAML file (defaults to the built-in watchlist)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Console output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch quotes, write the HTML page and upload it
    Publish(commands::publish::PublishArgs),
    /// Fetch quotes and print the report without writing anything
    Show(commands::show::ShowArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockpage=info".parse()?)
                .add_directive("twse_mis_api=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = AppConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Publish(args) => commands::publish::run(args, &config, &format).await?,
        Commands::Show(args) => commands::show::run(args, &config, &format).await?,
    }

    Ok(())
}

use anyhow::Result;
use clap::Args;
use stockpage_lib::{pipeline, AppConfig, Market};

use crate::output::{
    print_json, print_report_csv, print_report_markdown, print_report_table, OutputFormat,
};

#[derive(Args)]
pub struct ShowArgs {
    /// Listed symbols to quote instead of the watchlist (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub listed: Vec<String>,

    /// OTC symbols to quote instead of the watchlist (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub otc: Vec<String>,

    /// Symbols as market:code, e.g. tse:2330,otc:6547 (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_symbol)]
    pub symbol: Vec<(Market, String)>,
}

fn parse_symbol(s: &str) -> Result<(Market, String), String> {
    let (market, code) = s
        .split_once(':')
        .ok_or_else(|| format!("expected market:code, got '{}'", s))?;
    let market = market
        .parse::<Market>()
        .map_err(|_| format!("unknown market '{}' (expected tse or otc)", market))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing symbol code in '{}'", s));
    }
    Ok((market, code.to_string()))
}

/// Replaces the configured watchlist when any symbol flag is given.
fn apply_symbols(args: &ShowArgs, config: &mut AppConfig) {
    if args.listed.is_empty() && args.otc.is_empty() && args.symbol.is_empty() {
        return;
    }
    config.listed = args.listed.clone();
    config.otc = args.otc.clone();
    for (market, code) in &args.symbol {
        match market {
            Market::Listed => config.listed.push(code.clone()),
            Market::Otc => config.otc.push(code.clone()),
        }
    }
}

pub async fn run(args: &ShowArgs, config: &AppConfig, format: &OutputFormat) -> Result<()> {
    let mut config = config.clone();
    apply_symbols(args, &mut config);

    let rows = pipeline::fetch_report(&config, &config.client()).await?;

    eprintln!("{} quotes", rows.len());

    match format {
        OutputFormat::Table => print_report_table(&rows),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_report_csv(&rows)?,
        OutputFormat::Markdown => print_report_markdown(&rows),
    }

    Ok(())
}

use anyhow::Result;
use serde::Serialize;
use stockpage_lib::{ReportRow, RunSummary};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct QuoteRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Total Volume")]
    #[serde(rename = "Total Volume")]
    cumulative_volume: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Prev Close")]
    #[serde(rename = "Prev Close")]
    previous_close: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    change: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated_at: String,
}

// -- Row builders --

fn build_quote_rows(rows: &[ReportRow]) -> Vec<QuoteRow> {
    rows.iter()
        .map(|r| QuoteRow {
            symbol: r.symbol.clone(),
            name: r.short_name.clone(),
            price: r.price.clone(),
            volume: r.volume.clone(),
            cumulative_volume: r.cumulative_volume.clone(),
            open: r.open.clone(),
            high: r.high.clone(),
            low: r.low.clone(),
            previous_close: r.previous_close.clone(),
            change: r.percent_change.to_string(),
            updated_at: r.updated_at.clone(),
        })
        .collect()
}

// -- Report output --

pub fn print_report_table(rows: &[ReportRow]) {
    println!("{}", Table::new(build_quote_rows(rows)));
}

pub fn print_report_markdown(rows: &[ReportRow]) {
    let mut table = Table::new(build_quote_rows(rows));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_report_csv(rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_quote_rows(rows) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Run summary --

fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {} rows ({} bytes) to {}",
        summary.rows,
        summary.bytes_written,
        summary.output_path.display()
    )];
    match summary.uploaded_bytes {
        Some(bytes) => lines.push(format!("Uploaded {} bytes", bytes)),
        None => lines.push("Upload skipped".to_string()),
    }
    lines
}

pub fn print_summary(summary: &RunSummary, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(summary)?;
            wtr.flush()?;
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            for line in summary_lines(summary) {
                eprintln!("{}", line);
            }
        }
    }
    Ok(())
}

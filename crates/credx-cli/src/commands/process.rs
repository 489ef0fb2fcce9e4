//! Process command - extract data from a single report file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use credx_core::export::Table;
use credx_core::models::config::{ExportConfig, MatchOccurrence};
use credx_core::{BureauReportParser, ReportResult, file_name_component};

use super::{load_config, load_report_text};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write every export table as a CSV file into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Take the last match of a repeated label instead of the first
    #[arg(long)]
    last_match: bool,

    /// List extraction issues on stderr
    #[arg(long)]
    show_issues: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV of the facility table
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    pb.set_message("Reading report...");
    let text = load_report_text(&args.input, &config)?;

    pb.set_message("Extracting report data...");
    let mut extraction = config.extraction.clone();
    if args.last_match {
        extraction.occurrence = MatchOccurrence::Last;
    }
    let parser = BureauReportParser::new().with_config(extraction);
    let source_name = args.input.file_name().and_then(|n| n.to_str());
    let result = parser.parse_named(&text, source_name)?;

    pb.finish_and_clear();

    if args.show_issues && !result.metadata.issues.is_empty() {
        eprintln!("{}", style("Extraction issues:").yellow());
        for issue in &result.metadata.issues {
            eprintln!("  - {}", issue);
        }
    }

    if let Some(dir) = &args.output_dir {
        let written = write_tables(dir, &result, &config.export)?;
        eprintln!(
            "{} Wrote {} tables to {}",
            style("✓").green(),
            written.len(),
            dir.display()
        );
    }

    let output = format_result(&result, args.format, &config.export)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(
    result: &ReportResult,
    format: OutputFormat,
    export: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => {
            let tables = result.tables(export);
            // The facility sheet is last, followed only by the inquiry sheet.
            let index = tables
                .len()
                .checked_sub(1 + usize::from(result.inquiries.is_some()))
                .ok_or_else(|| anyhow::anyhow!("No facility table produced"))?;
            table_csv(&tables[index])
        }
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Serialize one table to CSV.
pub fn table_csv(table: &Table) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write every export table as `<artifact> - <sheet>.csv` into `dir`.
pub fn write_tables(
    dir: &Path,
    result: &ReportResult,
    export: &ExportConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let artifact = result
        .artifact_name("csv", export)
        .unwrap_or_else(|| credx_core::artifact_name("", "csv", export));
    let stem = Path::new(&artifact)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report")
        .to_string();

    let mut written = Vec::new();
    for table in result.tables(export) {
        let path = dir.join(format!(
            "{} - {}.csv",
            file_name_component(&stem),
            file_name_component(&table.sheet_name)
        ));
        fs::write(&path, table_csv(&table)?)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn format_text(result: &ReportResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Report: {} ({})\n", result.family, result.dialect));
    output.push_str(&format!("Name: {}\n", result.summary.name));
    if let Some(score) = &result.summary.score {
        output.push_str(&format!("Score: {}\n", score));
    }
    output.push('\n');

    output.push_str(&format!("Facilities: {}\n", result.facilities.len()));
    for record in &result.facilities {
        output.push_str(&format!(
            "  {:>3}. {} | sanctioned {} | balance {} | {} | max DPD {}\n",
            record.sequence,
            record
                .account_type
                .as_deref()
                .or(record.facility_label.as_deref())
                .unwrap_or("-"),
            record.sanctioned_amount.value,
            record.current_balance.value,
            record.status,
            record.max_dpd
        ));
    }

    if !result.summaries.is_empty() {
        output.push('\n');
        for table in &result.summaries {
            output.push_str(&format!("{}: {} rows\n", table.name, table.rows.len()));
        }
    }

    if let Some(inquiries) = &result.inquiries {
        output.push_str(&format!("Inquiries: {}\n", inquiries.rows.len()));
    }

    output.push_str(&format!(
        "\nIssues: {} ({} fields not found)\n",
        result.metadata.issues.len(),
        result.metadata.missing_field_count()
    ));

    output
}

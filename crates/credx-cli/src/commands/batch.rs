//! Batch processing command for multiple report files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use credx_core::models::config::CredxConfig;
use credx_core::{BureauReportParser, ReportResult};

use super::process::{OutputFormat, format_result, write_tables};
use super::{is_supported, load_config, load_report_text};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write every export table of each report as CSV
    #[arg(long)]
    tables: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<ReportResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = Arc::new(BureauReportParser::new().with_config(config.extraction.clone()));
    let mut results = Vec::with_capacity(files.len());

    // Reports are independent; run at most `jobs` of them at a time.
    for chunk in files.chunks(args.jobs.max(1)) {
        let handles: Vec<_> = chunk
            .iter()
            .cloned()
            .map(|path| {
                let parser = Arc::clone(&parser);
                let config = Arc::clone(&config);
                tokio::task::spawn_blocking(move || {
                    let file_start = Instant::now();
                    let outcome = process_single_file(&path, &parser, &config);
                    (path, outcome, file_start.elapsed().as_millis() as u64)
                })
            })
            .collect();

        for handle in handles {
            let (path, outcome, processing_time_ms) = handle
                .await
                .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?;

            match outcome {
                Ok(report) => results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error: None,
                    processing_time_ms,
                }),
                Err(e) => {
                    let error_msg = e.to_string();
                    if args.continue_on_error {
                        warn!("Failed to process {}: {}", path.display(), error_msg);
                        results.push(ProcessResult {
                            path,
                            report: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        });
                    } else {
                        error!("Failed to process {}: {}", path.display(), error_msg);
                        overall_pb.abandon();
                        anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                    }
                }
            }

            overall_pb.inc(1);
        }
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(report) = &result.report else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("report");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_result(report, args.format, &config.export)?)?;
            debug!("Wrote output to {}", output_path.display());

            if args.tables {
                write_tables(output_dir, report, &config.export)?;
            }
        }
    }

    if args.summary {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let summary_name = format!("summary_{}.csv", timestamp);
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join(&summary_name))
            .unwrap_or_else(|| PathBuf::from(&summary_name));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &BureauReportParser,
    config: &CredxConfig,
) -> anyhow::Result<ReportResult> {
    let text = load_report_text(path, config)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text extracted from {}", path.display());
    }

    let source_name = path.file_name().and_then(|n| n.to_str());
    Ok(parser.parse_named(&text, source_name)?)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "family",
        "dialect",
        "name",
        "score",
        "facilities",
        "active",
        "closed",
        "max_dpd",
        "issues",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(report) = &result.report {
            let active = report
                .facilities
                .iter()
                .filter(|f| f.status == credx_core::AccountStatus::Active)
                .count();
            let max_dpd = report.facilities.iter().map(|f| f.max_dpd).max().unwrap_or(0);

            wtr.write_record([
                filename,
                "success",
                report.family.display_name(),
                report.dialect.name(),
                &report.summary.name,
                report.summary.score.as_deref().unwrap_or(""),
                &report.facilities.len().to_string(),
                &active.to_string(),
                &(report.facilities.len() - active).to_string(),
                &max_dpd.to_string(),
                &report.metadata.issues.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

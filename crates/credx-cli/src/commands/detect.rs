//! Detect command - report family and dialect of a file.

use std::path::PathBuf;

use clap::Args;
use console::style;

use credx_core::report::detect;

use super::{load_config, load_report_text};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input files (PDF or extracted text)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut unrecognized = 0;

    for path in &args.inputs {
        let text = load_report_text(path, &config)?;
        match detect(&text) {
            Some(dialect) => println!(
                "{}\t{}\t{}",
                path.display(),
                dialect.family().display_name(),
                dialect
            ),
            None => {
                unrecognized += 1;
                println!("{}\t{}", path.display(), style("unrecognized").yellow());
            }
        }
    }

    if unrecognized > 0 {
        anyhow::bail!("{} of {} files not recognized", unrecognized, args.inputs.len());
    }

    Ok(())
}

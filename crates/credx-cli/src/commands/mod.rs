//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod detect;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use credx_core::{CredxConfig, PdfExtractor};

/// Per-user config file written by `credx config init` and `credx config set`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("credx")
        .join("config.json")
}

/// Load the config from `--config`, then the per-user file, then defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CredxConfig> {
    if let Some(path) = config_path {
        return Ok(CredxConfig::from_file(Path::new(path))?);
    }

    let user_config = default_config_path();
    if user_config.exists() {
        debug!("Using config {}", user_config.display());
        Ok(CredxConfig::from_file(&user_config)?)
    } else {
        Ok(CredxConfig::default())
    }
}

/// Read report text from a PDF or a plain-text dump.
pub fn load_report_text(path: &Path, config: &CredxConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let text = PdfExtractor::text_from_bytes(&data)?;
            if text.trim().chars().count() < config.pdf.min_text_length {
                warn!(
                    "{} yielded only {} characters of text; scanned reports are not supported",
                    path.display(),
                    text.trim().chars().count()
                );
            }
            text
        }
        "txt" | "text" => fs::read_to_string(path)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    debug!("Loaded {} characters from {}", text.len(), path.display());
    Ok(text)
}

/// Supported input extensions.
pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
}

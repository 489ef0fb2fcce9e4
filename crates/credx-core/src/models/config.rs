//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for credx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredxConfig {
    /// Report extraction policy.
    pub extraction: ExtractionConfig,

    /// Tabular export configuration.
    pub export: ExportConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Which occurrence a rule takes when a label repeats inside one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOccurrence {
    #[default]
    First,
    Last,
}

/// Report extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Match taken for a label repeated within one block.
    pub occurrence: MatchOccurrence,

    /// Number of month labels heading a payment-history grid.
    pub history_months: usize,

    /// Grid statuses treated as blank cells.
    pub blank_status_markers: Vec<String>,

    /// Fixed column count of inquiry tables.
    pub inquiry_columns: usize,

    /// Line that starts a new inquiry record.
    pub inquiry_record_delimiter: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            occurrence: MatchOccurrence::First,
            history_months: 12,
            blank_status_markers: vec!["-".to_string()],
            inquiry_columns: 6,
            inquiry_record_delimiter: "XXXX".to_string(),
        }
    }
}

/// Tabular export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Spreadsheet sheet-name length limit.
    pub max_sheet_name_len: usize,

    /// chrono format string used to render parsed dates.
    pub date_format: String,

    /// Prefix of proposed export file names.
    pub artifact_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_sheet_name_len: 31,
            date_format: "%d/%m/%Y".to_string(),
            artifact_prefix: "Parsed_Output_".to_string(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

impl CredxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

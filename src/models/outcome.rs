use serde::Serialize;
use std::path::PathBuf;

use super::ProductRecord;

/// Where an export landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub csv_path: PathBuf,
    pub xlsx_path: PathBuf,
    pub message: String,
}

/// Result envelope of one scrape-and-save invocation.
///
/// Failures carry a message and no records.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub success: bool,
    pub message: String,
    pub records: Vec<ProductRecord>,
    pub count: usize,
    pub export: Option<ExportReport>,
}

impl ScrapeOutcome {
    pub fn succeeded(records: Vec<ProductRecord>, export: ExportReport) -> Self {
        Self {
            success: true,
            message: export.message.clone(),
            count: records.len(),
            records,
            export: Some(export),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            records: Vec::new(),
            count: 0,
            export: None,
        }
    }
}

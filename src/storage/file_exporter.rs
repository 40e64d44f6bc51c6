use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::csv_export::write_csv;
use super::storage_manager::StorageManager;
use super::xlsx_export::write_xlsx;
use super::{Exporter, OutputNames};
use crate::clock::Clock;
use crate::error::ExportError;
use crate::models::{ExportReport, ProductRecord};

/// Writes CSV + XLSX pairs into one output directory.
///
/// Both files are staged next to their final paths and only renamed into
/// place once both were written, so a failed export leaves nothing behind.
pub struct FileExporter {
    output_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileExporter {
    pub fn new(output_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            output_dir: output_dir.into(),
            clock,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn target_paths(&self, names: &OutputNames) -> (PathBuf, PathBuf) {
        let now = self.clock.now();
        let csv_name = names
            .csv
            .clone()
            .unwrap_or_else(|| StorageManager::default_csv_name(now));
        let xlsx_name = names
            .xlsx
            .clone()
            .unwrap_or_else(|| StorageManager::default_xlsx_name(now));
        (self.output_dir.join(csv_name), self.output_dir.join(xlsx_name))
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

impl Exporter for FileExporter {
    fn export(&self, records: &[ProductRecord], names: &OutputNames) -> Result<ExportReport, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }

        fs::create_dir_all(&self.output_dir)?;
        let (csv_path, xlsx_path) = self.target_paths(names);
        let csv_staged = StorageManager::staging_path(&csv_path);
        let xlsx_staged = StorageManager::staging_path(&xlsx_path);

        let staged = write_csv(records, &csv_staged).and_then(|_| write_xlsx(records, &xlsx_staged));
        if let Err(e) = staged {
            discard(&csv_staged);
            discard(&xlsx_staged);
            return Err(e);
        }

        if let Err(e) = fs::rename(&csv_staged, &csv_path) {
            discard(&csv_staged);
            discard(&xlsx_staged);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&xlsx_staged, &xlsx_path) {
            discard(&xlsx_staged);
            discard(&csv_path);
            return Err(e.into());
        }

        info!("✅ CSV saved: {}", csv_path.display());
        info!("✅ Excel saved: {}", xlsx_path.display());

        Ok(ExportReport {
            message: format!(
                "saved {} products to {} and {}",
                records.len(),
                csv_path.display(),
                xlsx_path.display()
            ),
            csv_path,
            xlsx_path,
        })
    }
}

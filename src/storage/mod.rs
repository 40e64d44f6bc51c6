pub mod csv_export;
pub mod file_exporter;
pub mod storage_manager;
pub mod xlsx_export;

pub use file_exporter::FileExporter;
pub use storage_manager::StorageManager;

use crate::error::ExportError;
use crate::models::{ExportReport, ProductRecord};

/// Optional caller-chosen file names; `None` means date-based defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputNames {
    pub csv: Option<String>,
    pub xlsx: Option<String>,
}

impl OutputNames {
    pub fn new(csv: Option<&str>, xlsx: Option<&str>) -> Self {
        Self {
            csv: csv.map(str::to_string),
            xlsx: xlsx.map(str::to_string),
        }
    }
}

/// Persists a batch of records as tabular files
pub trait Exporter: Send + Sync {
    fn export(&self, records: &[ProductRecord], names: &OutputNames) -> Result<ExportReport, ExportError>;
}

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Output file naming for exported product batches
pub struct StorageManager;

impl StorageManager {
    pub fn default_csv_name(now: NaiveDateTime) -> String {
        format!("products_{}.csv", now.format("%Y%m%d"))
    }

    pub fn default_xlsx_name(now: NaiveDateTime) -> String {
        format!("products_{}.xlsx", now.format("%Y%m%d"))
    }

    /// Hidden sibling that receives the bytes before the final rename
    pub fn staging_path(final_path: &Path) -> PathBuf {
        let file_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        final_path.with_file_name(format!(".{}.partial", file_name))
    }
}

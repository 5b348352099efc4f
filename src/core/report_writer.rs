use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes `{path_without_extension}.csv` with a single `header` column and
    /// one row per entry, in order. Returns the written path.
    pub fn write<S: AsRef<str>>(
        &self,
        path_without_extension: &str,
        header: &str,
        rows: &[S],
    ) -> Result<PathBuf> {
        let path = PathBuf::from(format!("{}.csv", path_without_extension));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([header])?;
        for row in rows {
            writer.write_record([row.as_ref()])?;
        }
        writer.flush()?;

        tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

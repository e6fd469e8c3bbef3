use std::fs::{self, File};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::extractor::ListingRecord;

pub const CSV_HEADER: [&str; 3] = ["title", "link", "date_added"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write `records` as UTF-8 CSV with a `title,link,date_added` header.
///
/// The file is replaced if it exists; missing parent directories are created.
pub fn write_csv(records: &[ListingRecord], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    // Written by hand so an empty run still gets a header row
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "csv written");
    Ok(())
}

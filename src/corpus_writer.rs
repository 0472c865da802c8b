use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use log::info;
use crate::error::PersistenceError;
use crate::extractor::ScrapeRecord;

/// Writes the whole corpus as an indented JSON array, in corpus order.
///
/// The document goes to a sibling `.tmp` file first and is renamed into
/// place, so `destination` is either the previous file or the complete new
/// one.
pub fn persist<P: AsRef<Path>>(records: &[ScrapeRecord], destination: P) -> Result<(), PersistenceError> {
    let destination = destination.as_ref();
    let json = serde_json::to_string_pretty(records)?;

    let tmp_path = temp_path_for(destination);
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| PersistenceError::Io { path, source }
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    file.write_all(json.as_bytes()).map_err(io_err(&tmp_path))?;
    file.sync_all().map_err(io_err(&tmp_path))?;
    drop(file);

    fs::rename(&tmp_path, destination).map_err(io_err(destination))?;

    info!("Wrote {} records to {:?}", records.len(), destination);
    Ok(())
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

//! Dataset reader and writer seams.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use pain_model::MetadataMap;

use crate::csv::{read_csv_table, write_csv_table};
use crate::error::{IngestError, Result};
use crate::sidecar::{read_metadata, write_metadata};

/// Rows and column metadata loaded from a source dataset.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub data: DataFrame,
    pub metadata: MetadataMap,
    /// Where the rows were read from.
    pub path: PathBuf,
}

/// Loads a dataset by source name.
pub trait DatasetReader {
    fn read(&self, source: &str) -> Result<LoadedDataset>;
}

/// Persists a dataset under a name and returns the path written.
pub trait DatasetWriter {
    fn write(&self, name: &str, data: &DataFrame, metadata: &MetadataMap) -> Result<PathBuf>;
}

/// Directory of `<name>.csv` files with optional `<name>.meta.json`
/// sidecars.
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    dir: PathBuf,
}

impl CsvDatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.meta.json"))
    }
}

impl DatasetReader for CsvDatasetStore {
    fn read(&self, source: &str) -> Result<LoadedDataset> {
        let path = self.data_path(source);
        let data = read_csv_table(&path)?;
        let metadata = read_metadata(&self.metadata_path(source))?;
        debug!(
            path = %path.display(),
            rows = data.height(),
            columns = data.width(),
            metadata_entries = metadata.len(),
            "loaded dataset"
        );
        Ok(LoadedDataset {
            data,
            metadata,
            path,
        })
    }
}

impl DatasetWriter for CsvDatasetStore {
    /// Both files are staged next to their targets and renamed into place
    /// only once both were written, so a failed write leaves neither.
    fn write(&self, name: &str, data: &DataFrame, metadata: &MetadataMap) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| IngestError::FileWrite {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = self.data_path(name);
        let metadata_path = self.metadata_path(name);
        let staged_data = staging_path(&path);
        let staged_metadata = staging_path(&metadata_path);

        let staged = write_csv_table(&staged_data, data)
            .and_then(|()| write_metadata(&staged_metadata, metadata));
        if let Err(err) = staged {
            discard(&[&staged_data, &staged_metadata]);
            return Err(err);
        }
        if let Err(e) = std::fs::rename(&staged_metadata, &metadata_path) {
            discard(&[&staged_data, &staged_metadata]);
            return Err(IngestError::FileWrite {
                path: metadata_path,
                source: e,
            });
        }
        if let Err(e) = std::fs::rename(&staged_data, &path) {
            discard(&[&staged_data, &metadata_path]);
            return Err(IngestError::FileWrite { path, source: e });
        }

        debug!(path = %path.display(), rows = data.height(), "wrote dataset");
        Ok(path)
    }
}

/// Hidden sibling of `target` used while a write is in flight.
fn staging_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{file_name}.tmp"))
}

fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}

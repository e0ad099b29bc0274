//! JSON sidecar holding column metadata next to a CSV file.
//!
//! The sidecar is a single object mapping column name to its metadata
//! record. Unknown keys inside a record are preserved.

use std::path::Path;

use pain_model::MetadataMap;

use crate::error::{IngestError, Result};

/// Load a sidecar if one exists. A missing file yields empty metadata.
pub fn read_metadata(path: &Path) -> Result<MetadataMap> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no column metadata sidecar");
            return Ok(MetadataMap::new());
        }
        Err(e) => {
            return Err(IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| IngestError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_metadata(path: &Path, metadata: &MetadataMap) -> Result<()> {
    let mut json =
        serde_json::to_string_pretty(metadata).map_err(|source| IngestError::MetadataWrite {
            path: path.to_path_buf(),
            source,
        })?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

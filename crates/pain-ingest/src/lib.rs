//! Survey dataset loading and persistence.
//!
//! Rows are carried as Polars DataFrames and column metadata as a
//! [`MetadataMap`](pain_model::MetadataMap). The shipped store keeps rows in
//! CSV and metadata in a JSON sidecar; other formats plug in through
//! [`DatasetReader`] and [`DatasetWriter`].
//!
//! # Example
//!
//! ```ignore
//! use pain_ingest::{CsvDatasetStore, DatasetReader};
//!
//! let store = CsvDatasetStore::new("data/raw");
//! let loaded = store.read("G214_PQ")?;
//! println!("{} rows", loaded.data.height());
//! ```

mod csv;
mod error;
mod sidecar;
mod store;

// === Error Types ===
pub use error::{IngestError, Result};

// === Row Storage ===
pub use csv::{read_csv_table, write_csv_table};

// === Column Metadata ===
pub use sidecar::{read_metadata, write_metadata};

// === Reader / Writer ===
pub use store::{CsvDatasetStore, DatasetReader, DatasetWriter, LoadedDataset};

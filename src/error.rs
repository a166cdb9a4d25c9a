use std::path::PathBuf;

use thiserror::Error;

/// Reasons a single CSV file could not be turned into a table.
///
/// The importer reports these per file and carries on with the next one.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Table '{0}' already exists.")]
    TableExists(String),

    #[error("No columns to parse from file {0:?}")]
    NoColumns(PathBuf),

    #[error("reading {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("decoding {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("row {row} has {found} field(s), expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

use crate::catalogue::CatalogueError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while harvesting and classifying metadata records.
///
/// None of these are recovered from inside the crate: a failure on any record
/// aborts the whole harvest and the matches gathered so far are dropped.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Catalogue request failed: {0}")]
    Catalogue(#[from] CatalogueError),

    /// A path expression could not be compiled or evaluated. This points at a
    /// broken entry in the path table, not at bad input data.
    #[error("Invalid path query `{path}`: {message}")]
    Query { path: String, message: String },

    #[error("Malformed XML in record '{identifier}': {message}")]
    Xml { identifier: String, message: String },

    #[error("Cannot derive a file name from record identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record summary: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! # Catalogue Endpoints
//!
//! The harvest procedure never speaks the CSW wire protocol itself. It drives a
//! [`Catalogue`] implementation, which performs the request and keeps the last
//! result set around until the next call replaces it.

pub mod filter;

pub use filter::Filter;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a catalogue endpoint.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Invalid catalogue endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("Failed to fetch records from the catalogue: {0}")]
    Fetch(String),

    #[error("The catalogue returned an exception report: {0}")]
    Exception(String),

    #[error("Failed to parse the catalogue response: {0}")]
    Parse(String),
}

/// How much of each record the catalogue should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementSetName {
    Brief,
    Summary,
    #[default]
    Full,
}

impl ElementSetName {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementSetName::Brief => "brief",
            ElementSetName::Summary => "summary",
            ElementSetName::Full => "full",
        }
    }
}

/// The parameters of one `GetRecords` search.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRecordsRequest {
    /// Namespace URI of the schema records should be returned in.
    pub output_schema: String,
    /// Optional predicate, passed through to the endpoint untouched.
    pub constraints: Option<Filter>,
    pub element_set: ElementSetName,
    pub max_records: u32,
    /// 1-based index of the first record to return.
    pub start_position: u32,
}

/// One metadata record as returned by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRecord {
    /// The server-assigned identifier, usually URN or URL shaped.
    pub identifier: String,
    /// The raw XML of the record, parseable on its own.
    pub xml: String,
}

/// A remote metadata catalogue.
///
/// `get_records` takes `&mut self` because it replaces the endpoint's result
/// set in place; a handle cannot serve two searches at once.
#[async_trait]
pub trait Catalogue: Send {
    /// Runs one search and stores its results, replacing the previous ones.
    async fn get_records(&mut self, request: &GetRecordsRequest) -> Result<(), CatalogueError>;

    /// The records of the last successful search, in the order the endpoint
    /// returned them.
    fn records(&self) -> &[CatalogueRecord];
}

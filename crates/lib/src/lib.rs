//! # GLOS Metadata Harvesting
//!
//! This crate harvests ISO 19115/19139 metadata records from a Catalogue Service
//! for the Web (CSW), picks out the records tagged with the "GLOS Categories"
//! keyword thesaurus, and can archive every retrieved record as an XML file.
//!
//! The wire protocol lives behind the [`catalogue::Catalogue`] trait so that the
//! harvest logic can run against any endpoint implementation, including the
//! HTTP client in `glos-harvest-csw` and the in-memory mock used by tests.

pub mod catalogue;
pub mod constants;
pub mod document;
pub mod errors;
pub mod harvest;
pub mod iso_paths;
pub mod summary;
pub mod xpath;

pub use catalogue::{
    Catalogue, CatalogueError, CatalogueRecord, ElementSetName, Filter, GetRecordsRequest,
};
pub use document::MetadataDocument;
pub use errors::HarvestError;
pub use harvest::{
    fetch_records, glos_records_request, is_glos_record, record_file_name, WRITE_LOG_TARGET,
};
pub use iso_paths::IsoPath;
pub use summary::{summarize, write_summaries_json, BoundingBox, RecordSummary};
pub use xpath::{safe_xpath, Extraction};

//! # Harvest Procedure
//!
//! Runs one catalogue search, keeps the records that belong to the GLOS
//! Categories thesaurus, and optionally archives every retrieved record as an
//! XML file named after its identifier.

use crate::catalogue::{Catalogue, ElementSetName, Filter, GetRecordsRequest};
use crate::constants::{ns, DEFAULT_MAX_RECORDS, GLOS_CATEGORIES};
use crate::document::MetadataDocument;
use crate::errors::HarvestError;
use crate::iso_paths::IsoPath;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tracing target of the per-file `Wrote <path>` confirmations.
pub const WRITE_LOG_TARGET: &str = "glos_harvest::written";

/// The search issued by [`fetch_records`]: full ISO records, first page only.
pub fn glos_records_request(filter: Option<Filter>) -> GetRecordsRequest {
    GetRecordsRequest {
        output_schema: ns::GMD.to_string(),
        constraints: filter,
        element_set: ElementSetName::Full,
        max_records: DEFAULT_MAX_RECORDS,
        start_position: 1,
    }
}

/// True if any thesaurus title of the document contains "GLOS Categories".
pub fn is_glos_record(document: &MetadataDocument) -> Result<bool, HarvestError> {
    Ok(document
        .extract(IsoPath::ThesaurusName)?
        .contains_substring(GLOS_CATEGORIES))
}

/// The file name a record is archived under: the last non-empty `/` or `:`
/// separated segment of its identifier, with an `.xml` suffix.
///
/// `http://example.org/md/abc` becomes `abc.xml` and `urn:glos:metadata:12345`
/// becomes `12345.xml`.
pub fn record_file_name(identifier: &str) -> Result<String, HarvestError> {
    identifier
        .trim()
        .rsplit(['/', ':'])
        .find(|segment| !segment.is_empty())
        .map(|segment| format!("{segment}.xml"))
        .ok_or_else(|| HarvestError::InvalidIdentifier(identifier.to_string()))
}

/// Fetches up to 1000 ISO records matching `filter` and returns those tagged
/// with the GLOS Categories thesaurus, in the order the catalogue returned them.
///
/// When `write_dir` is given, every retrieved record is written there, matched
/// or not, overwriting files from earlier runs. Each file is confirmed with an
/// info event on [`WRITE_LOG_TARGET`].
///
/// Any error aborts the whole harvest; no partial result is returned.
#[instrument(skip_all, fields(write_dir = ?write_dir))]
pub async fn fetch_records<C>(
    catalogue: &mut C,
    filter: Option<Filter>,
    write_dir: Option<&Path>,
) -> Result<Vec<MetadataDocument>, HarvestError>
where
    C: Catalogue + ?Sized,
{
    let request = glos_records_request(filter);
    info!(
        "Requesting up to {} records in schema {}",
        request.max_records, request.output_schema
    );
    catalogue.get_records(&request).await?;

    let records = catalogue.records();
    info!("Catalogue returned {} records.", records.len());

    let mut glos_records = Vec::new();
    for record in records {
        let document = MetadataDocument::parse(&record.identifier, &record.xml)?;

        let is_member = is_glos_record(&document)?;
        debug!(identifier = %record.identifier, is_member, "Classified record");

        if let Some(dir) = write_dir {
            let fname = dir.join(record_file_name(&record.identifier)?);
            document.save(&fname)?;
            info!(target: WRITE_LOG_TARGET, "Wrote {}", fname.display());
        }

        if is_member {
            glos_records.push(document);
        }
    }

    info!(
        "Found {} GLOS records out of {} retrieved.",
        glos_records.len(),
        records.len()
    );
    Ok(glos_records)
}

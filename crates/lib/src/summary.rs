//! # Record Summaries
//!
//! Flattens the named ISO fields of a document into a serializable struct,
//! handy for listing what a harvest found.

use crate::document::MetadataDocument;
use crate::errors::HarvestError;
use crate::iso_paths::IsoPath;
use serde::Serialize;
use std::path::Path;

/// A geographic bounding box in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub west: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub north: Option<f64>,
}

/// The named fields of one ISO metadata record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub identifier: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub bbox: BoundingBox,
    pub thesauri: Vec<String>,
    pub glos_categories: Vec<String>,
    pub keywords: Vec<String>,
    pub parameters: Vec<String>,
    pub thumbnail: Option<String>,
    pub geojson_url: Option<String>,
    pub info_url: Option<String>,
    pub wms_urls: Vec<String>,
    pub online_resources: Vec<String>,
    pub links: Vec<String>,
    pub pdfs: Vec<String>,
}

fn first(document: &MetadataDocument, field: IsoPath) -> Result<Option<String>, HarvestError> {
    Ok(document
        .extract(field)?
        .into_vec()
        .into_iter()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty()))
}

fn all(document: &MetadataDocument, field: IsoPath) -> Result<Vec<String>, HarvestError> {
    Ok(document
        .extract(field)?
        .into_vec()
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

fn coordinate(document: &MetadataDocument, field: IsoPath) -> Result<Option<f64>, HarvestError> {
    Ok(first(document, field)?.and_then(|text| text.parse().ok()))
}

/// Every `gmd:linkage/gmd:URL` of the `CI_OnlineResource` elements matched by `field`.
fn linkages(document: &MetadataDocument, field: IsoPath) -> Result<Vec<String>, HarvestError> {
    let resources = document.select(&field.as_xpath(), None, true)?;
    let mut urls = Vec::new();
    for resource in resources.into_vec() {
        let url = crate::xpath::safe_xpath(
            resource,
            "./gmd:linkage/gmd:URL/text()",
            document.namespaces(),
            false,
        )?;
        urls.extend(url.texts().into_vec().iter().map(|url| url.trim().to_string()));
    }
    Ok(urls)
}

/// Evaluates every named path against `document`.
pub fn summarize(document: &MetadataDocument) -> Result<RecordSummary, HarvestError> {
    let mut wms_urls = all(document, IsoPath::ServiceWmsUrl)?;
    wms_urls.extend(all(document, IsoPath::OnlineResourceWms)?);

    Ok(RecordSummary {
        identifier: first(document, IsoPath::Identifier)?,
        title: first(document, IsoPath::Title)?,
        abstract_text: first(document, IsoPath::Abstract)?,
        start_time: first(document, IsoPath::StartTime)?,
        end_time: first(document, IsoPath::EndTime)?,
        bbox: BoundingBox {
            west: coordinate(document, IsoPath::WestLongitude)?,
            south: coordinate(document, IsoPath::SouthLatitude)?,
            east: coordinate(document, IsoPath::EastLongitude)?,
            north: coordinate(document, IsoPath::NorthLatitude)?,
        },
        thesauri: all(document, IsoPath::ThesaurusName)?,
        glos_categories: all(document, IsoPath::GlosCategories)?,
        keywords: all(document, IsoPath::Keywords)?,
        parameters: all(document, IsoPath::Parameters)?,
        thumbnail: first(document, IsoPath::Thumbnail)?,
        geojson_url: first(document, IsoPath::GeoJsonUrl)?,
        info_url: first(document, IsoPath::InfoUrl)?,
        wms_urls,
        online_resources: linkages(document, IsoPath::OnlineResources)?,
        links: linkages(document, IsoPath::Links)?,
        pdfs: linkages(document, IsoPath::Pdfs)?,
    })
}

/// Writes the summaries as a pretty-printed JSON array, replacing `path`.
pub fn write_summaries_json(path: &Path, summaries: &[RecordSummary]) -> Result<(), HarvestError> {
    let json = serde_json::to_string_pretty(summaries)?;
    std::fs::write(path, json).map_err(|source| HarvestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

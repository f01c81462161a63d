//! # ISO 19139 Field Paths
//!
//! A fixed table mapping the fields of an ISO metadata record to the XPath that
//! locates them, relative to the `gmd:MD_Metadata` element.

use crate::constants::{ns, GLOS_CATEGORIES, VARIABLES_THESAURUS};
use crate::xpath::Namespaces;

const DATA_IDENTIFICATION: &str = "./gmd:identificationInfo/gmd:MD_DataIdentification";
const DIGITAL_TRANSFER_ONLINE: &str = "./gmd:distributionInfo/gmd:MD_Distribution/gmd:transferOptions/gmd:MD_DigitalTransferOptions/gmd:onLine";
const THESAURUS_TITLE: &str = "gmd:thesaurusName/gmd:CI_Citation/gmd:title/gco:CharacterString";

/// The edges of a geographic bounding box, named after their ISO elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundingEdge {
    West,
    South,
    East,
    North,
}

impl BoundingEdge {
    pub fn element_name(self) -> &'static str {
        match self {
            BoundingEdge::West => "westBoundLongitude",
            BoundingEdge::South => "southBoundLatitude",
            BoundingEdge::East => "eastBoundLongitude",
            BoundingEdge::North => "northBoundLatitude",
        }
    }
}

/// Fills the bounding-box template with one edge element.
pub fn geo_extent_xpath(edge: BoundingEdge) -> String {
    format!(
        "{DATA_IDENTIFICATION}/gmd:extent/gmd:EX_Extent/gmd:geographicElement/gmd:EX_GeographicBoundingBox/gmd:{}/gco:Decimal/text()[1]",
        edge.element_name()
    )
}

/// Keyword text of the `MD_Keywords` blocks whose thesaurus title satisfies
/// `comparison` (`=` or `!=`) against `thesaurus`.
fn keywords_xpath(comparison: &str, thesaurus: &str) -> String {
    format!(
        "{DATA_IDENTIFICATION}/gmd:descriptiveKeywords/gmd:MD_Keywords[{THESAURUS_TITLE}{comparison}\"{thesaurus}\"]/gmd:keyword/gco:CharacterString/text()"
    )
}

fn online_resource_xpath(predicate: &str) -> String {
    format!("{DIGITAL_TRANSFER_ONLINE}/gmd:CI_OnlineResource[{predicate}]")
}

/// Named fields of an ISO 19139 record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsoPath {
    // Identification info
    Identifier,
    Title,
    Abstract,
    ThesaurusName,
    Thumbnail,
    // Temporal extent
    StartTime,
    EndTime,
    // Geographic bounding box
    WestLongitude,
    SouthLatitude,
    EastLongitude,
    NorthLatitude,
    // Keywords
    GlosCategories,
    Keywords,
    Parameters,
    // Distribution info
    OnlineResources,
    GeoJsonUrl,
    OnlineResourceWms,
    InfoUrl,
    Links,
    Pdfs,
    // Service identification
    ServiceWmsUrl,
}

impl IsoPath {
    pub const ALL: [IsoPath; 21] = [
        IsoPath::Identifier,
        IsoPath::Title,
        IsoPath::Abstract,
        IsoPath::ThesaurusName,
        IsoPath::Thumbnail,
        IsoPath::StartTime,
        IsoPath::EndTime,
        IsoPath::WestLongitude,
        IsoPath::SouthLatitude,
        IsoPath::EastLongitude,
        IsoPath::NorthLatitude,
        IsoPath::GlosCategories,
        IsoPath::Keywords,
        IsoPath::Parameters,
        IsoPath::OnlineResources,
        IsoPath::GeoJsonUrl,
        IsoPath::OnlineResourceWms,
        IsoPath::InfoUrl,
        IsoPath::Links,
        IsoPath::Pdfs,
        IsoPath::ServiceWmsUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IsoPath::Identifier => "identifier",
            IsoPath::Title => "title",
            IsoPath::Abstract => "abstract",
            IsoPath::ThesaurusName => "thesaurus_name",
            IsoPath::Thumbnail => "thumbnail",
            IsoPath::StartTime => "start_time",
            IsoPath::EndTime => "end_time",
            IsoPath::WestLongitude => "west_longitude",
            IsoPath::SouthLatitude => "south_latitude",
            IsoPath::EastLongitude => "east_longitude",
            IsoPath::NorthLatitude => "north_latitude",
            IsoPath::GlosCategories => "glos_categories",
            IsoPath::Keywords => "keywords",
            IsoPath::Parameters => "parameters",
            IsoPath::OnlineResources => "online_resources",
            IsoPath::GeoJsonUrl => "geojson_url",
            IsoPath::OnlineResourceWms => "online_resource_wms",
            IsoPath::InfoUrl => "info_url",
            IsoPath::Links => "links",
            IsoPath::Pdfs => "pdfs",
            IsoPath::ServiceWmsUrl => "service_wms_url",
        }
    }

    /// The XPath for this field.
    pub fn as_xpath(self) -> String {
        match self {
            IsoPath::Identifier => "./gmd:fileIdentifier/gco:CharacterString/text()[1]".to_string(),
            IsoPath::Title => format!(
                "{DATA_IDENTIFICATION}/gmd:citation/gmd:CI_Citation/gmd:title/gco:CharacterString/text()[1]"
            ),
            IsoPath::Abstract => {
                format!("{DATA_IDENTIFICATION}/gmd:abstract/gco:CharacterString/text()[1]")
            }
            IsoPath::ThesaurusName => format!(
                "{DATA_IDENTIFICATION}/gmd:descriptiveKeywords/gmd:MD_Keywords/{THESAURUS_TITLE}/text()"
            ),
            IsoPath::Thumbnail => "/gmd:MD_Metadata/gmd:identificationInfo/gmd:MD_DataIdentification/gmd:graphicOverview/gmd:MD_BrowseGraphic[gmd:fileDescription/gco:CharacterString=\"thumbnail\"]/gmd:fileName/gco:CharacterString/text()".to_string(),
            IsoPath::StartTime => format!(
                "{DATA_IDENTIFICATION}/gmd:extent/gmd:EX_Extent/gmd:temporalElement/gmd:EX_TemporalExtent/gmd:extent/gml:TimePeriod/gml:beginPosition/text()"
            ),
            IsoPath::EndTime => format!(
                "{DATA_IDENTIFICATION}/gmd:extent/gmd:EX_Extent/gmd:temporalElement/gmd:EX_TemporalExtent/gmd:extent/gml:TimePeriod/gml:endPosition/text()"
            ),
            IsoPath::WestLongitude => geo_extent_xpath(BoundingEdge::West),
            IsoPath::SouthLatitude => geo_extent_xpath(BoundingEdge::South),
            IsoPath::EastLongitude => geo_extent_xpath(BoundingEdge::East),
            IsoPath::NorthLatitude => geo_extent_xpath(BoundingEdge::North),
            // These two must stay complementary: same literal, opposite comparison.
            IsoPath::GlosCategories => keywords_xpath("=", GLOS_CATEGORIES),
            IsoPath::Keywords => keywords_xpath("!=", GLOS_CATEGORIES),
            IsoPath::Parameters => keywords_xpath("=", VARIABLES_THESAURUS),
            IsoPath::OnlineResources => "./gmd:distributionInfo/gmd:MD_Distribution//gmd:MD_DigitalTransferOptions/gmd:onLine/gmd:CI_OnlineResource".to_string(),
            IsoPath::GeoJsonUrl => format!(
                "{}/gmd:linkage/gmd:URL/text()",
                online_resource_xpath("gmd:protocol/gco:CharacterString=\"GeoJSON\"")
            ),
            IsoPath::OnlineResourceWms => "./gmd:distributionInfo/gmd:MD_Distribution/gmd:distributor/gmd:MD_Distributor/gmd:distributorTransferOptions/gmd:MD_DigitalTransferOptions/gmd:onLine/gmd:CI_OnlineResource[gmd:protocol/gco:CharacterString='OGC:WMS-1.3.0-http-get-capabilities']/gmd:linkage/gmd:URL/text()".to_string(),
            IsoPath::InfoUrl => format!(
                "{}/gmd:linkage/gmd:URL/text()",
                online_resource_xpath("gmd:name/gco:CharacterString=\"Info URL\"")
            ),
            IsoPath::Links => {
                online_resource_xpath("gmd:protocol/gco:CharacterString=\"WWW:LINK-1.0-http--link\"")
            }
            IsoPath::Pdfs => online_resource_xpath("gmd:protocol/gco:CharacterString=\"application/pdf\""),
            IsoPath::ServiceWmsUrl => "./gmd:identificationInfo/srv:SV_ServiceIdentification/srv:containsOperations/srv:SV_OperationMetadata[srv:operationName/gco:CharacterString='GetCapabilities']/srv:connectPoint/gmd:CI_OnlineResource/gmd:linkage/gmd:URL/text()".to_string(),
        }
    }
}

/// The prefixes used by the path table, bound to their ISO namespace URIs.
///
/// Useful when a record declares its namespaces below the root element or
/// under different prefixes.
pub fn iso_namespaces() -> Namespaces {
    [
        ("gmd", ns::GMD),
        ("gco", ns::GCO),
        ("gml", ns::GML),
        ("gmi", ns::GMI),
        ("gmx", ns::GMX),
        ("srv", ns::SRV),
        ("xlink", ns::XLINK),
    ]
    .into_iter()
    .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
    .collect()
}

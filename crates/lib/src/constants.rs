//! # Shared Constants
//!
//! Namespace URIs, thesaurus names and harvest defaults shared across the
//! crates of the workspace.

/// The thesaurus title that marks a record as part of the GLOS catalogue.
pub const GLOS_CATEGORIES: &str = "GLOS Categories";

/// The thesaurus title used for observed-variable keywords.
pub const VARIABLES_THESAURUS: &str = "Variables";

/// The maximum number of records requested in a single harvest.
pub const DEFAULT_MAX_RECORDS: u32 = 1000;

/// The GLOS GeoNetwork CSW endpoint harvested by default.
pub const DEFAULT_CSW_ENDPOINT: &str = "http://data.glos.us/metadata/srv/eng/csw";

/// The free-text pattern used to select THREDDS-backed records by default.
pub const DEFAULT_ANYTEXT_PATTERN: &str = "%tds.glos.us%";

/// The directory records are written to by default.
pub const DEFAULT_WAF_DIR: &str = "/tmp/glos_waf";

pub mod ns {
    //! Namespace URIs of the ISO metadata and OGC catalogue schemas.

    pub const GMD: &str = "http://www.isotc211.org/2005/gmd";
    pub const GCO: &str = "http://www.isotc211.org/2005/gco";
    pub const GML: &str = "http://www.opengis.net/gml";
    pub const GML32: &str = "http://www.opengis.net/gml/3.2";
    pub const GMI: &str = "http://www.isotc211.org/2005/gmi";
    pub const GMX: &str = "http://www.isotc211.org/2005/gmx";
    pub const SRV: &str = "http://www.isotc211.org/2005/srv";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    pub const CSW: &str = "http://www.opengis.net/cat/csw/2.0.2";
    pub const OGC: &str = "http://www.opengis.net/ogc";
    pub const OWS: &str = "http://www.opengis.net/ows";
}

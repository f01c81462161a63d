use async_trait::async_trait;
use glos_harvest::{Catalogue, CatalogueError, CatalogueRecord, GetRecordsRequest};
use std::sync::Once;

// --- Tracing ---

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Mock Catalogue ---

/// An in-memory catalogue that serves a fixed batch of records.
#[derive(Debug, Default)]
pub struct MockCatalogue {
    batch: Vec<CatalogueRecord>,
    records: Vec<CatalogueRecord>,
    requests: Vec<GetRecordsRequest>,
    failure: Option<String>,
}

impl MockCatalogue {
    pub fn new(batch: Vec<CatalogueRecord>) -> Self {
        Self {
            batch,
            ..Default::default()
        }
    }

    /// A catalogue whose searches always fail with a fetch error.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Every request received so far, for assertion.
    pub fn requests(&self) -> &[GetRecordsRequest] {
        &self.requests
    }
}

#[async_trait]
impl Catalogue for MockCatalogue {
    async fn get_records(&mut self, request: &GetRecordsRequest) -> Result<(), CatalogueError> {
        self.requests.push(request.clone());
        if let Some(message) = &self.failure {
            return Err(CatalogueError::Fetch(message.clone()));
        }
        self.records = self
            .batch
            .iter()
            .take(request.max_records as usize)
            .cloned()
            .collect();
        Ok(())
    }

    fn records(&self) -> &[CatalogueRecord] {
        &self.records
    }
}

// --- ISO Record Fixtures ---

/// Builds small but schema-shaped ISO 19139 records for tests.
#[derive(Debug, Clone, Default)]
pub struct IsoRecordBuilder {
    file_identifier: String,
    title: Option<String>,
    abstract_text: Option<String>,
    thesauri: Vec<(String, Vec<String>)>,
    bbox: Option<[f64; 4]>,
    time_period: Option<(String, String)>,
    online: Vec<(String, String, String)>,
}

impl IsoRecordBuilder {
    pub fn new(file_identifier: &str) -> Self {
        Self {
            file_identifier: file_identifier.to_string(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn abstract_text(mut self, text: &str) -> Self {
        self.abstract_text = Some(text.to_string());
        self
    }

    /// Adds one `MD_Keywords` block under the given thesaurus title.
    pub fn keywords(mut self, thesaurus: &str, keywords: &[&str]) -> Self {
        self.thesauri.push((
            thesaurus.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        ));
        self
    }

    /// West, south, east, north.
    pub fn bbox(mut self, west: f64, south: f64, east: f64, north: f64) -> Self {
        self.bbox = Some([west, south, east, north]);
        self
    }

    pub fn time_period(mut self, begin: &str, end: &str) -> Self {
        self.time_period = Some((begin.to_string(), end.to_string()));
        self
    }

    /// Adds a `CI_OnlineResource` to the digital transfer options.
    pub fn online_resource(mut self, url: &str, protocol: &str, name: &str) -> Self {
        self.online
            .push((url.to_string(), protocol.to_string(), name.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut identification = String::new();
        if let Some(title) = &self.title {
            identification.push_str(&format!(
                "<gmd:citation><gmd:CI_Citation><gmd:title><gco:CharacterString>{title}</gco:CharacterString></gmd:title></gmd:CI_Citation></gmd:citation>"
            ));
        }
        if let Some(text) = &self.abstract_text {
            identification.push_str(&format!(
                "<gmd:abstract><gco:CharacterString>{text}</gco:CharacterString></gmd:abstract>"
            ));
        }
        for (thesaurus, keywords) in &self.thesauri {
            identification.push_str("<gmd:descriptiveKeywords><gmd:MD_Keywords>");
            for keyword in keywords {
                identification.push_str(&format!(
                    "<gmd:keyword><gco:CharacterString>{keyword}</gco:CharacterString></gmd:keyword>"
                ));
            }
            identification.push_str(&format!(
                "<gmd:thesaurusName><gmd:CI_Citation><gmd:title><gco:CharacterString>{thesaurus}</gco:CharacterString></gmd:title></gmd:CI_Citation></gmd:thesaurusName>"
            ));
            identification.push_str("</gmd:MD_Keywords></gmd:descriptiveKeywords>");
        }
        if self.bbox.is_some() || self.time_period.is_some() {
            identification.push_str("<gmd:extent><gmd:EX_Extent>");
            if let Some([west, south, east, north]) = self.bbox {
                identification.push_str(&format!(
                    "<gmd:geographicElement><gmd:EX_GeographicBoundingBox>\
                     <gmd:westBoundLongitude><gco:Decimal>{west}</gco:Decimal></gmd:westBoundLongitude>\
                     <gmd:eastBoundLongitude><gco:Decimal>{east}</gco:Decimal></gmd:eastBoundLongitude>\
                     <gmd:southBoundLatitude><gco:Decimal>{south}</gco:Decimal></gmd:southBoundLatitude>\
                     <gmd:northBoundLatitude><gco:Decimal>{north}</gco:Decimal></gmd:northBoundLatitude>\
                     </gmd:EX_GeographicBoundingBox></gmd:geographicElement>"
                ));
            }
            if let Some((begin, end)) = &self.time_period {
                identification.push_str(&format!(
                    "<gmd:temporalElement><gmd:EX_TemporalExtent><gmd:extent>\
                     <gml:TimePeriod gml:id=\"tp\"><gml:beginPosition>{begin}</gml:beginPosition><gml:endPosition>{end}</gml:endPosition></gml:TimePeriod>\
                     </gmd:extent></gmd:EX_TemporalExtent></gmd:temporalElement>"
                ));
            }
            identification.push_str("</gmd:EX_Extent></gmd:extent>");
        }

        let mut distribution = String::new();
        if !self.online.is_empty() {
            distribution.push_str("<gmd:distributionInfo><gmd:MD_Distribution><gmd:transferOptions><gmd:MD_DigitalTransferOptions>");
            for (url, protocol, name) in &self.online {
                distribution.push_str(&format!(
                    "<gmd:onLine><gmd:CI_OnlineResource>\
                     <gmd:linkage><gmd:URL>{url}</gmd:URL></gmd:linkage>\
                     <gmd:protocol><gco:CharacterString>{protocol}</gco:CharacterString></gmd:protocol>\
                     <gmd:name><gco:CharacterString>{name}</gco:CharacterString></gmd:name>\
                     </gmd:CI_OnlineResource></gmd:onLine>"
                ));
            }
            distribution.push_str("</gmd:MD_DigitalTransferOptions></gmd:transferOptions></gmd:MD_Distribution></gmd:distributionInfo>");
        }

        format!(
            r#"<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd" xmlns:gco="http://www.isotc211.org/2005/gco" xmlns:gml="http://www.opengis.net/gml"><gmd:fileIdentifier><gco:CharacterString>{id}</gco:CharacterString></gmd:fileIdentifier><gmd:identificationInfo><gmd:MD_DataIdentification>{identification}</gmd:MD_DataIdentification></gmd:identificationInfo>{distribution}</gmd:MD_Metadata>"#,
            id = self.file_identifier,
        )
    }

    /// The record paired with a catalogue identifier.
    pub fn record(&self, identifier: &str) -> CatalogueRecord {
        CatalogueRecord {
            identifier: identifier.to_string(),
            xml: self.build(),
        }
    }
}

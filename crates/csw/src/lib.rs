//! # `glos-harvest-csw`: CSW 2.0.2 Catalogue Client
//!
//! This crate talks to an OGC Catalogue Service for the Web over HTTP. It
//! implements the `Catalogue` trait from the core `glos-harvest` library by
//! POSTing `GetRecords` requests and splitting the response into standalone
//! ISO metadata records.

pub mod request;
pub mod response;

use async_trait::async_trait;
use glos_harvest::{Catalogue, CatalogueError, CatalogueRecord, GetRecordsRequest};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub use request::{encode_filter, get_records_body};
pub use response::parse_get_records_response;

/// Custom error types for the CSW client.
#[derive(Error, Debug)]
pub enum CswError {
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unsupported endpoint scheme '{0}'")]
    Scheme(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalogue responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Exception(String),
    #[error("Malformed XML in catalogue response: {0}")]
    Xml(String),
    #[error("Unexpected catalogue response: {0}")]
    UnexpectedResponse(String),
}

/// A helper to convert the specific `CswError` into the generic `CatalogueError`.
impl From<CswError> for CatalogueError {
    fn from(err: CswError) -> Self {
        match err {
            CswError::Url(e) => CatalogueError::InvalidEndpoint {
                url: String::new(),
                message: e.to_string(),
            },
            CswError::Scheme(scheme) => CatalogueError::InvalidEndpoint {
                url: String::new(),
                message: format!("unsupported scheme '{scheme}'"),
            },
            CswError::Http(e) => CatalogueError::Fetch(e.to_string()),
            CswError::Status { .. } => CatalogueError::Fetch(err.to_string()),
            CswError::Exception(message) => CatalogueError::Exception(message),
            CswError::Xml(message) => CatalogueError::Parse(message),
            CswError::UnexpectedResponse(message) => CatalogueError::Parse(message),
        }
    }
}

/// An HTTP client for one CSW endpoint.
///
/// The client keeps the records of its last successful search; a new search
/// replaces them.
#[derive(Debug, Clone)]
pub struct CswClient {
    url: Url,
    client: reqwest::Client,
    records: Vec<CatalogueRecord>,
}

impl CswClient {
    /// Creates a client for the endpoint at `url`. No request is made.
    pub fn new(url: &str) -> Result<Self, CatalogueError> {
        let invalid = |err: CswError| CatalogueError::InvalidEndpoint {
            url: url.to_string(),
            message: err.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| invalid(e.into()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(CswError::Scheme(parsed.scheme().to_string())));
        }

        Ok(Self {
            url: parsed,
            client: reqwest::Client::new(),
            records: Vec::new(),
        })
    }

    /// Applies a total request timeout to every search.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, CatalogueError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CswError::from)?;
        Ok(self)
    }

    /// Uses a preconfigured HTTP client, e.g. one with proxies or custom TLS.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post_get_records(&self, request: &GetRecordsRequest) -> Result<String, CswError> {
        let body = get_records_body(request);
        debug!("GetRecords request body: {body}");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            // Some servers report OWS exceptions with an error status.
            if text.contains("ExceptionReport") {
                if let Err(err @ CswError::Exception(_)) = parse_get_records_response(&text) {
                    return Err(err);
                }
            }
            return Err(CswError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Catalogue for CswClient {
    /// POSTs a `GetRecords` request and stores the returned records.
    async fn get_records(&mut self, request: &GetRecordsRequest) -> Result<(), CatalogueError> {
        info!("Sending GetRecords to {}", self.url);
        let body = self.post_get_records(request).await?;
        let records = parse_get_records_response(&body)?;
        info!("Received {} records from {}", records.len(), self.url);
        self.records = records;
        Ok(())
    }

    fn records(&self) -> &[CatalogueRecord] {
        &self.records
    }
}

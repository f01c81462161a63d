//! # Parsed Metadata Documents
//!
//! A [`MetadataDocument`] owns the XML tree of one catalogue record together
//! with the default namespace bindings for path queries: the ISO prefixes of
//! the path table, overlaid with the prefixes declared on the root element.

use crate::errors::HarvestError;
use crate::iso_paths::{iso_namespaces, IsoPath};
use crate::xpath::{safe_xpath, Extraction, Namespaces};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use sxd_document::dom::{Document, Element};
use sxd_document::{parser, writer, Package};
use sxd_xpath::nodeset::Node;

/// The parsed XML tree of one metadata record.
pub struct MetadataDocument {
    identifier: String,
    package: Package,
    namespaces: Namespaces,
}

impl std::fmt::Debug for MetadataDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataDocument")
            .field("identifier", &self.identifier)
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}

impl MetadataDocument {
    /// Parses the raw XML of the record identified by `identifier`.
    pub fn parse(identifier: &str, xml: &str) -> Result<Self, HarvestError> {
        let xml_error = |message: String| HarvestError::Xml {
            identifier: identifier.to_string(),
            message,
        };

        let package = parser::parse(xml).map_err(|e| xml_error(format!("{e:?}")))?;
        let mut namespaces = iso_namespaces();
        namespaces.extend(root_namespaces(xml).map_err(xml_error)?);

        Ok(Self {
            identifier: identifier.to_string(),
            package,
            namespaces,
        })
    }

    /// The catalogue identifier of the record this document was parsed from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The default query bindings. A prefix declared on the root element
    /// takes precedence over the ISO binding of the same name.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn document(&self) -> Document<'_> {
        self.package.as_document()
    }

    /// The document element, e.g. `gmd:MD_Metadata`.
    pub fn root_element(&self) -> Option<Element<'_>> {
        self.document()
            .root()
            .children()
            .into_iter()
            .find_map(|child| child.element())
    }

    /// Evaluates `path` against the document element.
    ///
    /// `namespaces` replaces the default bindings when given.
    pub fn select(
        &self,
        path: &str,
        namespaces: Option<&Namespaces>,
        force_list: bool,
    ) -> Result<Extraction<Node<'_>>, HarvestError> {
        let namespaces = namespaces.unwrap_or(&self.namespaces);
        match self.root_element() {
            Some(root) => safe_xpath(root, path, namespaces, force_list),
            None => safe_xpath(self.document().root(), path, namespaces, force_list),
        }
    }

    /// The string values matched by one of the named ISO paths.
    pub fn extract(&self, field: IsoPath) -> Result<Extraction<String>, HarvestError> {
        Ok(self.select(&field.as_xpath(), None, false)?.texts())
    }

    /// Serializes the tree back to XML.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writer::format_document(&self.document(), out)
    }

    pub fn to_xml_string(&self) -> std::io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Writes the tree to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), HarvestError> {
        let write_error = |source: std::io::Error| HarvestError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_error)?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out).map_err(write_error)?;
        out.flush().map_err(write_error)
    }
}

/// Collects the `xmlns:prefix` declarations of the first element in `xml`.
///
/// A default (unprefixed) namespace cannot be addressed from XPath 1.0 and is
/// left out.
fn root_namespaces(xml: &str) -> Result<Namespaces, String> {
    let mut reader = Reader::from_str(xml);
    let mut namespaces = Namespaces::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(element) | Event::Empty(element) => {
                for attr in element.attributes() {
                    let attr = attr.map_err(|e| e.to_string())?;
                    let key = attr.key.as_ref();
                    if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                        let value = attr.unescape_value().map_err(|e| e.to_string())?;
                        namespaces.insert(
                            String::from_utf8_lossy(prefix).into_owned(),
                            value.into_owned(),
                        );
                    }
                }
                return Ok(namespaces);
            }
            Event::Eof => return Err("document has no root element".to_string()),
            _ => {}
        }
    }
}

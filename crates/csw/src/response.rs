//! Splitting a `GetRecordsResponse` into standalone metadata records.

use crate::CswError;
use glos_harvest::CatalogueRecord;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fmt::Display;

/// Root elements of the ISO records a catalogue may return.
const RECORD_ELEMENTS: [&[u8]; 2] = [b"MD_Metadata", b"MI_Metadata"];

fn xml_error(err: impl Display) -> CswError {
    CswError::Xml(err.to_string())
}

/// Namespace declarations made on one element, as `(attribute name, uri)`
/// pairs, e.g. `("xmlns:gmd", "http://www.isotc211.org/2005/gmd")`.
fn declarations(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, CswError> {
    let mut found = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let value = attr.unescape_value().map_err(xml_error)?;
            found.push((
                String::from_utf8_lossy(key).into_owned(),
                value.into_owned(),
            ));
        }
    }
    Ok(found)
}

/// Re-declares namespaces inherited from the response envelope on the record
/// element, so the record parses on its own.
fn with_inherited_namespaces(
    raw: &str,
    tag: &str,
    scopes: &[Vec<(String, String)>],
    own: &[(String, String)],
) -> String {
    let mut inherited: Vec<(&str, &str)> = Vec::new();
    for (name, uri) in scopes.iter().flatten() {
        if own.iter().any(|(own_name, _)| own_name == name) {
            continue;
        }
        match inherited.iter_mut().find(|(seen, _)| *seen == name.as_str()) {
            Some(entry) => entry.1 = uri.as_str(),
            None => inherited.push((name.as_str(), uri.as_str())),
        }
    }
    if inherited.is_empty() {
        return raw.to_string();
    }

    let split = 1 + tag.len();
    let mut xml = String::with_capacity(raw.len() + 64 * inherited.len());
    xml.push_str(&raw[..split]);
    for (name, uri) in inherited {
        xml.push_str(&format!(" {name}=\"{}\"", quick_xml::escape::escape(uri)));
    }
    xml.push_str(&raw[split..]);
    xml
}

/// The `gmd:fileIdentifier/gco:CharacterString` text of a record.
fn file_identifier(xml: &str) -> Result<Option<String>, CswError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut in_identifier = false;
    let mut in_string = false;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"fileIdentifier" if depth == 2 => in_identifier = true,
                    b"CharacterString" if in_identifier => in_string = true,
                    _ => {}
                }
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"CharacterString" if in_string => in_string = false,
                    b"fileIdentifier" if in_identifier && depth == 2 => {
                        let identifier = text.trim();
                        return Ok((!identifier.is_empty()).then(|| identifier.to_string()));
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if in_string => text.push_str(&t.unescape().map_err(xml_error)?),
            Event::CData(c) if in_string => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Collects the exception texts of an `ows:ExceptionReport`.
fn exception_report(reader: &mut Reader<&[u8]>) -> Result<String, CswError> {
    let mut messages = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.local_name().as_ref() == b"Exception" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    if attr.key.as_ref() == b"exceptionCode" {
                        messages.push(format!(
                            "[{}]",
                            attr.unescape_value().map_err(xml_error)?
                        ));
                    }
                }
            }
            Event::Start(e) if e.local_name().as_ref() == b"ExceptionText" => {
                current = Some(String::new());
            }
            Event::Text(t) => {
                if let Some(buffer) = current.as_mut() {
                    buffer.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"ExceptionText" => {
                if let Some(text) = current.take() {
                    messages.push(text.trim().to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if messages.is_empty() {
        messages.push("no exception text provided".to_string());
    }
    Ok(messages.join(" "))
}

/// Splits a CSW `GetRecordsResponse` into one record per ISO metadata
/// element, keyed by file identifier.
///
/// A later record with an identifier already seen replaces the earlier one
/// but keeps its position.
pub fn parse_get_records_response(body: &str) -> Result<Vec<CatalogueRecord>, CswError> {
    let mut reader = Reader::from_str(body);
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    let mut records: Vec<CatalogueRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut root_seen = false;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let local = e.local_name();
                if !root_seen {
                    root_seen = true;
                    match local.as_ref() {
                        b"ExceptionReport" => {
                            return Err(CswError::Exception(exception_report(&mut reader)?))
                        }
                        b"GetRecordsResponse" => {}
                        other => {
                            return Err(CswError::UnexpectedResponse(format!(
                                "root element is '{}'",
                                String::from_utf8_lossy(other)
                            )))
                        }
                    }
                }

                if !RECORD_ELEMENTS.contains(&local.as_ref()) {
                    scopes.push(declarations(&e)?);
                    continue;
                }

                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let own = declarations(&e)?;
                reader.read_to_end(e.name()).map_err(xml_error)?;
                let end = reader.buffer_position() as usize;

                let xml = with_inherited_namespaces(&body[start..end], &tag, &scopes, &own);
                let identifier = file_identifier(&xml)?.ok_or_else(|| {
                    CswError::UnexpectedResponse(format!("{tag} record without a fileIdentifier"))
                })?;

                match positions.get(&identifier) {
                    Some(&index) => records[index].xml = xml,
                    None => {
                        positions.insert(identifier.clone(), records.len());
                        records.push(CatalogueRecord { identifier, xml });
                    }
                }
            }
            Event::End(_) => {
                scopes.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(CswError::UnexpectedResponse("empty response body".to_string()));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE_NAMESPACES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2" xmlns:gmd="http://www.isotc211.org/2005/gmd" xmlns:gco="http://www.isotc211.org/2005/gco">
  <csw:SearchStatus timestamp="2015-01-01T00:00:00"/>
  <csw:SearchResults numberOfRecordsMatched="1" numberOfRecordsReturned="1" nextRecord="0">
    <gmd:MD_Metadata>
      <gmd:fileIdentifier><gco:CharacterString>abc-123</gco:CharacterString></gmd:fileIdentifier>
    </gmd:MD_Metadata>
  </csw:SearchResults>
</csw:GetRecordsResponse>"#;

    #[test]
    fn test_inherited_namespaces_are_redeclared() {
        let records = parse_get_records_response(ENVELOPE_NAMESPACES).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "abc-123");
        let xml = &records[0].xml;
        assert!(xml.starts_with("<gmd:MD_Metadata xmlns:csw="));
        assert!(xml.contains("xmlns:gmd=\"http://www.isotc211.org/2005/gmd\""));
        assert!(xml.contains("xmlns:gco=\"http://www.isotc211.org/2005/gco\""));
        assert!(xml.ends_with("</gmd:MD_Metadata>"));
    }

    #[test]
    fn test_exception_report() {
        let body = r#"<?xml version="1.0"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.2.0">
  <ows:Exception exceptionCode="InvalidParameterValue" locator="outputSchema">
    <ows:ExceptionText>Unsupported output schema</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;
        match parse_get_records_response(body) {
            Err(CswError::Exception(message)) => {
                assert!(message.contains("InvalidParameterValue"));
                assert!(message.contains("Unsupported output schema"));
            }
            other => panic!("expected an exception report, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_root() {
        let result = parse_get_records_response("<html><body>Not Found</body></html>");
        assert!(matches!(result, Err(CswError::UnexpectedResponse(_))));
    }
}

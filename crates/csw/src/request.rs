//! Encoding of CSW 2.0.2 `GetRecords` requests and OGC filters.

use glos_harvest::constants::ns;
use glos_harvest::{Filter, GetRecordsRequest};
use quick_xml::escape::escape;

/// The XML body of a `GetRecords` POST request.
pub fn get_records_body(request: &GetRecordsRequest) -> String {
    let constraint = request
        .constraints
        .as_ref()
        .map(|filter| {
            format!(
                "<csw:Constraint version=\"1.1.0\"><ogc:Filter>{}</ogc:Filter></csw:Constraint>",
                encode_filter(filter)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<csw:GetRecords xmlns:csw=\"{csw}\" xmlns:ogc=\"{ogc}\" service=\"CSW\" version=\"2.0.2\"",
            " resultType=\"results\" startPosition=\"{start}\" maxRecords=\"{max}\"",
            " outputFormat=\"application/xml\" outputSchema=\"{schema}\">",
            "<csw:Query typeNames=\"csw:Record\">",
            "<csw:ElementSetName>{element_set}</csw:ElementSetName>",
            "{constraint}",
            "</csw:Query>",
            "</csw:GetRecords>"
        ),
        csw = ns::CSW,
        ogc = ns::OGC,
        start = request.start_position,
        max = request.max_records,
        schema = escape(request.output_schema.as_str()),
        element_set = request.element_set.as_str(),
        constraint = constraint,
    )
}

/// Encodes a filter as OGC Filter Encoding 1.1 operators.
pub fn encode_filter(filter: &Filter) -> String {
    match filter {
        Filter::PropertyIsLike {
            property,
            pattern,
            wildcard,
            single_char,
            escape_char,
        } => format!(
            "<ogc:PropertyIsLike wildCard=\"{}\" singleChar=\"{}\" escapeChar=\"{}\">{}<ogc:Literal>{}</ogc:Literal></ogc:PropertyIsLike>",
            escape(wildcard.to_string().as_str()),
            escape(single_char.to_string().as_str()),
            escape(escape_char.to_string().as_str()),
            property_name(property),
            escape(pattern.as_str()),
        ),
        Filter::PropertyIsEqualTo { property, literal } => comparison("PropertyIsEqualTo", property, literal),
        Filter::PropertyIsNotEqualTo { property, literal } => {
            comparison("PropertyIsNotEqualTo", property, literal)
        }
        Filter::And(filters) => logical("And", filters),
        Filter::Or(filters) => logical("Or", filters),
        Filter::Not(inner) => format!("<ogc:Not>{}</ogc:Not>", encode_filter(inner)),
    }
}

fn property_name(property: &str) -> String {
    format!("<ogc:PropertyName>{}</ogc:PropertyName>", escape(property))
}

fn comparison(operator: &str, property: &str, literal: &str) -> String {
    format!(
        "<ogc:{operator}>{}<ogc:Literal>{}</ogc:Literal></ogc:{operator}>",
        property_name(property),
        escape(literal),
    )
}

fn logical(operator: &str, filters: &[Filter]) -> String {
    let inner: String = filters.iter().map(encode_filter).collect();
    format!("<ogc:{operator}>{inner}</ogc:{operator}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glos_harvest::glos_records_request;

    #[test]
    fn test_like_filter_encoding() {
        let xml = encode_filter(&Filter::any_text_like("%tds.glos.us%"));
        assert_eq!(
            xml,
            "<ogc:PropertyIsLike wildCard=\"%\" singleChar=\"_\" escapeChar=\"\\\">\
             <ogc:PropertyName>csw:AnyText</ogc:PropertyName>\
             <ogc:Literal>%tds.glos.us%</ogc:Literal></ogc:PropertyIsLike>"
        );
    }

    #[test]
    fn test_literals_are_escaped() {
        let xml = encode_filter(&Filter::equal_to("dc:title", "Erie & <Huron>"));
        assert!(xml.contains("<ogc:Literal>Erie &amp; &lt;Huron&gt;</ogc:Literal>"));
    }

    #[test]
    fn test_nested_logical_filters() {
        let filter = Filter::And(vec![
            Filter::any_text_like("%buoy%"),
            !Filter::equal_to("dc:type", "service"),
        ]);
        let xml = encode_filter(&filter);
        assert!(xml.starts_with("<ogc:And><ogc:PropertyIsLike"));
        assert!(xml.contains("<ogc:Not><ogc:PropertyIsEqualTo>"));
        assert!(xml.ends_with("</ogc:Not></ogc:And>"));
    }

    #[test]
    fn test_body_without_constraint() {
        let body = get_records_body(&glos_records_request(None));
        assert!(body.contains("outputSchema=\"http://www.isotc211.org/2005/gmd\""));
        assert!(body.contains("maxRecords=\"1000\""));
        assert!(body.contains("<csw:ElementSetName>full</csw:ElementSetName>"));
        assert!(!body.contains("csw:Constraint"));
    }
}

//! # Path Query Tests
//!
//! Exercises `safe_xpath` and the ISO path table against realistic records.

use anyhow::Result;
use glos_harvest::iso_paths::iso_namespaces;
use glos_harvest::{Extraction, HarvestError, IsoPath, MetadataDocument};
use glos_harvest_test_utils::IsoRecordBuilder;
use std::collections::BTreeMap;

fn sample_document() -> Result<MetadataDocument> {
    let xml = IsoRecordBuilder::new("glos-0001")
        .title("Buoy 45005 observations")
        .abstract_text("Hourly meteorological observations from western Lake Erie.")
        .keywords("Variables", &["air_temperature", "wind_speed"])
        .keywords("GLOS Categories", &["Buoys", "Weather"])
        .bbox(-82.4, 41.6, -82.3, 41.7)
        .time_period("2014-05-01T00:00:00Z", "2014-10-31T23:00:00Z")
        .online_resource("http://tds.glos.us/thredds/45005.html", "WWW:LINK-1.0-http--link", "Info URL")
        .online_resource("http://tds.glos.us/thredds/45005.geojson", "GeoJSON", "GeoJSON")
        .build();
    Ok(MetadataDocument::parse("urn:glos:metadata:0001", &xml)?)
}

#[test]
fn test_zero_matches_is_absent() -> Result<()> {
    let doc = sample_document()?;

    let result = doc.extract(IsoPath::Thumbnail)?;
    assert_eq!(result, Extraction::Absent);

    // Forcing list output does not conjure matches.
    let forced = doc.select(&IsoPath::Thumbnail.as_xpath(), None, true)?;
    assert!(forced.is_absent());
    Ok(())
}

#[test]
fn test_single_match_is_scalar() -> Result<()> {
    let doc = sample_document()?;

    assert_eq!(
        doc.extract(IsoPath::Title)?,
        Extraction::Single("Buoy 45005 observations".to_string())
    );
    assert_eq!(
        doc.extract(IsoPath::Identifier)?,
        Extraction::Single("glos-0001".to_string())
    );
    Ok(())
}

#[test]
fn test_multiple_matches_keep_document_order() -> Result<()> {
    let doc = sample_document()?;

    assert_eq!(
        doc.extract(IsoPath::ThesaurusName)?,
        Extraction::Many(vec![
            "Variables".to_string(),
            "GLOS Categories".to_string()
        ])
    );
    Ok(())
}

#[test]
fn test_force_list_wraps_single_match() -> Result<()> {
    let doc = sample_document()?;

    let scalar = doc.select(&IsoPath::Title.as_xpath(), None, false)?.texts();
    let forced = doc.select(&IsoPath::Title.as_xpath(), None, true)?.texts();

    assert_eq!(scalar, Extraction::Single("Buoy 45005 observations".to_string()));
    assert_eq!(forced, Extraction::Many(vec!["Buoy 45005 observations".to_string()]));
    assert_eq!(scalar.into_vec(), forced.into_vec());
    Ok(())
}

#[test]
fn test_glos_and_other_keywords_are_complementary() -> Result<()> {
    let doc = sample_document()?;

    let glos = doc.extract(IsoPath::GlosCategories)?.into_vec();
    let others = doc.extract(IsoPath::Keywords)?.into_vec();
    let parameters = doc.extract(IsoPath::Parameters)?.into_vec();

    assert_eq!(glos, vec!["Buoys", "Weather"]);
    assert_eq!(others, vec!["air_temperature", "wind_speed"]);
    assert_eq!(parameters, others);
    Ok(())
}

#[test]
fn test_bounding_box_edges() -> Result<()> {
    let doc = sample_document()?;

    assert_eq!(doc.extract(IsoPath::WestLongitude)?, Extraction::Single("-82.4".to_string()));
    assert_eq!(doc.extract(IsoPath::SouthLatitude)?, Extraction::Single("41.6".to_string()));
    assert_eq!(doc.extract(IsoPath::EastLongitude)?, Extraction::Single("-82.3".to_string()));
    assert_eq!(doc.extract(IsoPath::NorthLatitude)?, Extraction::Single("41.7".to_string()));
    Ok(())
}

#[test]
fn test_online_resource_elements_are_returned_as_nodes() -> Result<()> {
    let doc = sample_document()?;

    let resources = doc.select(&IsoPath::OnlineResources.as_xpath(), None, false)?;
    assert_eq!(resources.len(), 2);

    let geojson = doc.extract(IsoPath::GeoJsonUrl)?;
    assert_eq!(
        geojson,
        Extraction::Single("http://tds.glos.us/thredds/45005.geojson".to_string())
    );
    Ok(())
}

#[test]
fn test_iso_prefixes_resolve_records_with_other_prefixes() -> Result<()> {
    // The same record written with different prefixes.
    let xml = r#"<md:MD_Metadata xmlns:md="http://www.isotc211.org/2005/gmd" xmlns:co="http://www.isotc211.org/2005/gco">
        <md:fileIdentifier><co:CharacterString>renamed</co:CharacterString></md:fileIdentifier>
    </md:MD_Metadata>"#;
    let doc = MetadataDocument::parse("renamed", xml)?;

    let by_default = doc.extract(IsoPath::Identifier)?;
    assert_eq!(by_default, Extraction::Single("renamed".to_string()));

    let with_iso = doc
        .select(&IsoPath::Identifier.as_xpath(), Some(&iso_namespaces()), false)?
        .texts();
    assert_eq!(with_iso, by_default);

    let by_own_prefixes = doc
        .select("./md:fileIdentifier/co:CharacterString/text()", None, false)?
        .texts();
    assert_eq!(by_own_prefixes, by_default);
    Ok(())
}

#[test]
fn test_unbound_prefix_is_a_query_error() -> Result<()> {
    let doc = sample_document()?;
    let only_gmd: BTreeMap<String, String> = [(
        "gmd".to_string(),
        "http://www.isotc211.org/2005/gmd".to_string(),
    )]
    .into_iter()
    .collect();

    let missing_gco = doc.select(&IsoPath::Title.as_xpath(), Some(&only_gmd), false);
    match missing_gco {
        Err(HarvestError::Query { message, .. }) => assert!(message.contains("`gco`")),
        other => panic!("expected a query error, got {other:?}"),
    }

    let unknown = doc.select("./foo:bar", None, false);
    assert!(matches!(unknown, Err(HarvestError::Query { .. })));
    Ok(())
}

#[test]
fn test_empty_path_is_a_query_error() -> Result<()> {
    let doc = sample_document()?;

    let result = doc.select("", None, false);
    assert!(matches!(result, Err(HarvestError::Query { ref path, .. }) if path.is_empty()));
    Ok(())
}

#[test]
fn test_malformed_path_is_a_query_error() -> Result<()> {
    let doc = sample_document()?;

    let result = doc.select("./gmd:identificationInfo[", None, false);
    match result {
        Err(HarvestError::Query { path, .. }) => assert_eq!(path, "./gmd:identificationInfo["),
        other => panic!("expected a query error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_non_node_expression_is_a_query_error() -> Result<()> {
    let doc = sample_document()?;

    let result = doc.select("count(./gmd:fileIdentifier)", None, false);
    assert!(matches!(result, Err(HarvestError::Query { .. })));
    Ok(())
}

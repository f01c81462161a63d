//! # CLI Harvest Command Tests
//!
//! Runs the `glos-harvest` binary against a mock CSW endpoint.

use assert_cmd::prelude::*;
use glos_harvest_test_utils::IsoRecordBuilder;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalogue_response() -> String {
    let glos = IsoRecordBuilder::new("urn:glos:metadata:12345")
        .title("Buoy 45005")
        .keywords("GLOS Categories", &["Buoys"])
        .build();
    let other = IsoRecordBuilder::new("http://example.org/md/abc")
        .title("Unrelated")
        .keywords("Variables", &["air_temperature"])
        .build();
    format!(
        r#"<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"><csw:SearchResults>{glos}{other}</csw:SearchResults></csw:GetRecordsResponse>"#
    )
}

async fn start_catalogue() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/csw"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalogue_response()))
        .mount(&server)
        .await;
    server
}

fn harvest_command(endpoint: &str, output_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("glos-harvest").unwrap();
    cmd.env("RUST_LOG", "info")
        .arg("--endpoint")
        .arg(endpoint)
        .arg("--output-dir")
        .arg(output_dir);
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_writes_all_records() {
    // Arrange
    let server = start_catalogue().await;
    let temp_dir = tempdir().unwrap();
    let output_dir = temp_dir.path().join("glos_waf");
    let endpoint = format!("{}/csw", server.uri());
    let dir = output_dir.clone();

    // Act
    let assert = tokio::task::spawn_blocking(move || harvest_command(&endpoint, &dir).assert())
        .await
        .unwrap();

    // Assert
    assert
        .success()
        .stdout(predicate::str::contains("Found 1 GLOS records."))
        .stdout(predicate::str::contains("Wrote"));
    assert!(output_dir.join("12345.xml").exists());
    assert!(output_dir.join("abc.xml").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_confirmations_survive_quiet_log_level() {
    // Arrange
    let server = start_catalogue().await;
    let temp_dir = tempdir().unwrap();
    let output_dir = temp_dir.path().join("glos_waf");
    let endpoint = format!("{}/csw", server.uri());
    let dir = output_dir.clone();

    // Act
    let assert = tokio::task::spawn_blocking(move || {
        harvest_command(&endpoint, &dir)
            .env("RUST_LOG", "warn")
            .assert()
    })
    .await
    .unwrap();

    // Assert
    let written_12345 = output_dir.join("12345.xml").display().to_string();
    let written_abc = output_dir.join("abc.xml").display().to_string();
    assert
        .success()
        .stdout(predicate::str::contains(format!("Wrote {written_12345}")))
        .stdout(predicate::str::contains(format!("Wrote {written_abc}")))
        .stdout(predicate::str::contains("Harvesting").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_writes_match_summaries() {
    // Arrange
    let server = start_catalogue().await;
    let temp_dir = tempdir().unwrap();
    let output_dir = temp_dir.path().join("unused");
    let summaries = temp_dir.path().join("matches.json");
    let endpoint = format!("{}/csw", server.uri());
    let (dir, json) = (output_dir.clone(), summaries.clone());

    // Act
    let assert = tokio::task::spawn_blocking(move || {
        harvest_command(&endpoint, &dir)
            .arg("--no-write")
            .arg("--matches-json")
            .arg(&json)
            .assert()
    })
    .await
    .unwrap();

    // Assert
    assert
        .success()
        .stdout(predicate::str::contains("Wrote 1 summaries"));
    assert!(!output_dir.exists());
    let content = std::fs::read_to_string(&summaries).unwrap();
    assert!(content.contains("\"title\": \"Buoy 45005\""));
    assert!(!content.contains("Unrelated"));
}

#[test]
fn test_unreachable_endpoint_fails() {
    // Arrange
    let temp_dir = tempdir().unwrap();

    // Act & Assert
    harvest_command("http://127.0.0.1:9/csw", temp_dir.path())
        .arg("--timeout-secs")
        .arg("5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Catalogue request failed"));
}

#[test]
fn test_invalid_endpoint_fails() {
    let temp_dir = tempdir().unwrap();

    harvest_command("not-a-url", temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalogue endpoint"));
}

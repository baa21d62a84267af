//! Snapshot file round trips through the filesystem

use std::fs;

use db_schema_diff::model::Catalog;
use db_schema_diff::serialize::{catalog_checksum, load_snapshot, save_snapshot, SnapshotFormat};
use db_schema_diff::SchemaError;
use pretty_assertions::assert_eq;

use crate::common::{sample_catalog, TestContext};

#[test]
fn test_binary_file_round_trip() {
    let ctx = TestContext::new();
    let catalog = sample_catalog();
    let path = ctx.save("sales.dbschema", &catalog);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"DBSC");

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.catalog, catalog);
}

#[test]
fn test_xml_file_round_trip() {
    let ctx = TestContext::new();
    let catalog = sample_catalog();
    let path = ctx.save("sales.xml", &catalog);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("<Snapshot Version=\"1\""));

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.catalog, catalog);
}

#[test]
fn test_format_detected_from_content_not_extension() {
    let ctx = TestContext::new();
    let path = ctx.path("misnamed.dbschema");
    save_snapshot(&path, &sample_catalog(), SnapshotFormat::Xml).unwrap();
    assert_eq!(load_snapshot(&path).unwrap().catalog, sample_catalog());
}

#[test]
fn test_save_creates_parent_directories() {
    let ctx = TestContext::new();
    let path = ctx.path("nested/deeper/a.dbschema");
    save_snapshot(&path, &Catalog::new("db", "srv"), SnapshotFormat::Binary).unwrap();
    assert!(path.exists());
}

#[test]
fn test_missing_file_reports_path() {
    let ctx = TestContext::new();
    let path = ctx.path("absent.dbschema");
    let err = load_snapshot(&path).unwrap_err();
    match err.downcast_ref::<SchemaError>() {
        Some(SchemaError::SnapshotReadError { path: reported, .. }) => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_checksum_independent_of_format_and_time() {
    let ctx = TestContext::new();
    let catalog = sample_catalog();
    let binary = load_snapshot(&ctx.save("a.dbschema", &catalog)).unwrap();
    let xml = load_snapshot(&ctx.save("a.xml", &catalog)).unwrap();
    assert_eq!(
        catalog_checksum(&binary.catalog).unwrap(),
        catalog_checksum(&xml.catalog).unwrap()
    );
}

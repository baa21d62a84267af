//! Snapshot files: a catalog plus a small envelope
//!
//! Binary snapshots start with the `DBSC` magic and an envelope version,
//! followed by the capture time and the catalog. XML snapshots wrap the
//! catalog in a `<Snapshot WrittenAt="...">` root element.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{BinaryReader, BinaryWriter, ObjectReadWriter, XmlReader, XmlWriter};
use crate::error::SchemaError;
use crate::model::{Catalog, SchemaObject};

const MAGIC: &[u8; 4] = b"DBSC";
const ENVELOPE_VERSION: u8 = 1;

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Binary,
    Xml,
}

impl SnapshotFormat {
    /// Infer from the file extension: `.xml` is XML, anything else binary
    pub fn from_path(path: &Path) -> SnapshotFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => SnapshotFormat::Xml,
            _ => SnapshotFormat::Binary,
        }
    }

    /// Detect from the leading bytes of a snapshot
    pub fn detect(data: &[u8]) -> Option<SnapshotFormat> {
        if data.starts_with(MAGIC) {
            return Some(SnapshotFormat::Binary);
        }
        let text = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let first = text.iter().find(|b| !b.is_ascii_whitespace())?;
        (*first == b'<').then_some(SnapshotFormat::Xml)
    }
}

/// A catalog read back from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub written_at: DateTime<Utc>,
    pub catalog: Catalog,
}

/// Encode a catalog with the snapshot envelope, stamped with the current time
pub fn encode_snapshot(catalog: &Catalog, format: SnapshotFormat) -> Result<Vec<u8>, SchemaError> {
    encode_snapshot_at(catalog, format, Utc::now())
}

/// Encode a catalog with the snapshot envelope and a given capture time
pub fn encode_snapshot_at(
    catalog: &Catalog,
    format: SnapshotFormat,
    written_at: DateTime<Utc>,
) -> Result<Vec<u8>, SchemaError> {
    let mut written_at = written_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut value = catalog.clone();
    debug!(catalog = %catalog.full_name(), ?format, "encoding snapshot");

    match format {
        SnapshotFormat::Binary => {
            let mut out = Vec::with_capacity(4096);
            out.extend_from_slice(MAGIC);
            out.push(ENVELOPE_VERSION);
            let mut writer = BinaryWriter::new(out);
            writer.read_write_string("WrittenAt", &mut written_at)?;
            writer.read_write_object("Catalog", &mut value)?;
            Ok(writer.into_inner())
        }
        SnapshotFormat::Xml => {
            let mut writer = XmlWriter::new(Vec::with_capacity(8192));
            writer.write_declaration()?;
            let version = ENVELOPE_VERSION.to_string();
            writer.begin_element(
                "Snapshot",
                &[("Version", version.as_str()), ("WrittenAt", written_at.as_str())],
            )?;
            writer.read_write_object("Catalog", &mut value)?;
            writer.end_object()?;
            Ok(writer.into_inner())
        }
    }
}

fn parse_written_at(value: &str) -> Result<DateTime<Utc>, SchemaError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchemaError::InvalidSnapshotFormat {
            message: format!("invalid WrittenAt '{}': {}", value, e),
        })
}

fn check_envelope_version(found: u8) -> Result<(), SchemaError> {
    if found > ENVELOPE_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found,
            known: ENVELOPE_VERSION,
        });
    }
    Ok(())
}

/// Decode a snapshot in either format
pub fn decode_snapshot(data: &[u8]) -> Result<Snapshot, SchemaError> {
    match SnapshotFormat::detect(data) {
        Some(SnapshotFormat::Binary) => {
            let body = &data[MAGIC.len()..];
            let (&version, body) = body.split_first().ok_or_else(|| {
                SchemaError::InvalidSnapshotFormat {
                    message: "missing envelope version".to_string(),
                }
            })?;
            check_envelope_version(version)?;
            let mut reader = BinaryReader::new(body);
            let mut written_at = String::new();
            reader.read_write_string("WrittenAt", &mut written_at)?;
            let mut catalog = Catalog::default();
            reader.read_write_object("Catalog", &mut catalog)?;
            reader.finish()?;
            Ok(Snapshot {
                written_at: parse_written_at(&written_at)?,
                catalog,
            })
        }
        Some(SnapshotFormat::Xml) => {
            let text = std::str::from_utf8(data).map_err(|e| SchemaError::InvalidSnapshotFormat {
                message: format!("XML snapshot is not UTF-8: {}", e),
            })?;
            let text = text.trim_start_matches('\u{feff}');
            let doc = roxmltree::Document::parse(text)?;
            let root = doc.root_element();
            if root.tag_name().name() != "Snapshot" {
                return Err(SchemaError::InvalidSnapshotFormat {
                    message: format!("unexpected root element <{}>", root.tag_name().name()),
                });
            }
            let version: u8 = root
                .attribute("Version")
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| SchemaError::InvalidSnapshotFormat {
                    message: "missing envelope Version".to_string(),
                })?;
            check_envelope_version(version)?;
            let written_at = parse_written_at(root.attribute("WrittenAt").unwrap_or(""))?;
            let mut reader = XmlReader::new(root);
            let mut catalog = Catalog::default();
            reader.read_write_object("Catalog", &mut catalog)?;
            reader.finish()?;
            Ok(Snapshot {
                written_at,
                catalog,
            })
        }
        None => Err(SchemaError::InvalidSnapshotFormat {
            message: "neither a binary nor an XML snapshot".to_string(),
        }),
    }
}

/// Write a catalog snapshot to `path`, stamped with the current time
pub fn save_snapshot(path: &Path, catalog: &Catalog, format: SnapshotFormat) -> Result<()> {
    save_snapshot_at(path, catalog, format, Utc::now())
}

/// Write a catalog snapshot to `path` keeping a given capture time
pub fn save_snapshot_at(
    path: &Path,
    catalog: &Catalog,
    format: SnapshotFormat,
    written_at: DateTime<Utc>,
) -> Result<()> {
    let data = encode_snapshot_at(catalog, format, written_at)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SchemaError::SnapshotWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, &data).map_err(|e| SchemaError::SnapshotWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "snapshot written");
    Ok(())
}

/// Read a snapshot from `path`, detecting its format
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let data = fs::read(path).map_err(|e| SchemaError::SnapshotReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let snapshot = decode_snapshot(&data)?;
    debug!(
        path = %path.display(),
        objects = snapshot.catalog.object_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Uppercase hex SHA-256 of the catalog's binary encoding
pub fn catalog_checksum(catalog: &Catalog) -> Result<String, SchemaError> {
    let bytes = super::to_bytes(catalog)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode_upper(hasher.finalize()))
}

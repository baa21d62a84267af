//! db-schema-diff: structural schema snapshots and drift detection
//!
//! This library captures a database's structural catalog (tables, columns,
//! routines, views, triggers) into an in-memory model, stores it as a
//! versioned binary or XML snapshot, regenerates DDL from it and compares
//! two snapshots into a tree of Equal / Missing / Different / Redundant
//! verdicts.

pub mod builder;
pub mod compare;
pub mod error;
pub mod model;
pub mod script;
pub mod serialize;
pub mod util;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

pub use error::SchemaError;

use compare::report::{format_report, ReportOptions};
use compare::CompareResultType;
use model::SchemaObject;
use serialize::{catalog_checksum, load_snapshot, save_snapshot_at, SnapshotFormat};

/// Options for comparing two snapshots
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Snapshot of the reference database
    pub master_path: PathBuf,
    /// Snapshot of the database checked against the reference
    pub checked_path: PathBuf,
    /// Include equal objects in the report
    pub show_equal: bool,
}

/// Rendered report and aggregated verdict of a snapshot comparison
#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub report: String,
    pub verdict: CompareResultType,
}

impl CompareOutcome {
    pub fn has_differences(&self) -> bool {
        !self.verdict.is_equal()
    }
}

/// Options for generating a creation script
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub input_path: PathBuf,
    /// Write the script here instead of returning it only
    pub output_path: Option<PathBuf>,
}

/// Options for re-encoding a snapshot
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Target encoding; inferred from the output extension when absent
    pub format: Option<SnapshotFormat>,
}

/// Compare two snapshot files and render the report
pub fn compare_snapshots(options: &CompareOptions) -> Result<CompareOutcome> {
    let master = load_snapshot(&options.master_path)?;
    let checked = load_snapshot(&options.checked_path)?;

    let result = compare::compare_catalogs(&master.catalog, &checked.catalog)?;
    let verdict = result.compare_result_type();
    debug!(%verdict, "snapshots compared");

    let mut report = String::new();
    for (label, path, snapshot) in [
        ("master", &options.master_path, &master),
        ("checked", &options.checked_path, &checked),
    ] {
        report.push_str(&format!(
            "{}: {} {} (written {}, sha256 {})\n",
            label,
            path.display(),
            snapshot.catalog.full_name(),
            snapshot.written_at.to_rfc3339(),
            catalog_checksum(&snapshot.catalog)?
        ));
    }
    report.push('\n');
    report.push_str(&format_report(
        &result,
        &ReportOptions {
            show_equal: options.show_equal,
        },
    ));

    Ok(CompareOutcome { report, verdict })
}

/// Generate the creation script of a snapshot, writing it out if requested
pub fn generate_script(options: &ScriptOptions) -> Result<String> {
    let snapshot = load_snapshot(&options.input_path)?;
    let script = script::generate_create_script(&snapshot.catalog);

    if let Some(output_path) = &options.output_path {
        fs::write(output_path, &script).map_err(|e| SchemaError::ScriptWriteError {
            path: output_path.clone(),
            source: e,
        })?;
        info!(path = %output_path.display(), "creation script written");
    }

    Ok(script)
}

/// Re-encode a snapshot, returning the format that was written
pub fn convert_snapshot(options: &ConvertOptions) -> Result<SnapshotFormat> {
    let snapshot = load_snapshot(&options.input_path)?;
    let format = options
        .format
        .unwrap_or_else(|| SnapshotFormat::from_path(&options.output_path));
    save_snapshot_at(
        &options.output_path,
        &snapshot.catalog,
        format,
        snapshot.written_at,
    )?;
    info!(
        from = %options.input_path.display(),
        to = %options.output_path.display(),
        ?format,
        "snapshot converted"
    );
    Ok(format)
}

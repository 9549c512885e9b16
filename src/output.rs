//! Output persistence for the estimation run.
//!
//! Writes the per-intersection results CSV, the raw error-sample CSV
//! (optionally gzip-compressed), and the JSON run summary.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::analyzers::types::{ErrorRecord, ResultRecord, RunSummary};

/// Writes one results row per intersection, replacing any previous output.
pub fn write_results(path: &str, records: &[ResultRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {path}"))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!(path, rows = records.len(), "Results table written");
    Ok(())
}

/// Writes the full error-sample table. With `gzip` the file gets a `.gz`
/// suffix appended to `path`. Returns the path actually written.
pub fn write_errors(path: &str, rows: &[ErrorRecord], gzip: bool) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| anyhow!("failed to flush error table: {e}"))?;

    let written = if gzip {
        let gz_path = format!("{path}.gz");
        let file =
            File::create(&gz_path).with_context(|| format!("failed to create {gz_path}"))?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?;
        gz_path
    } else {
        std::fs::write(path, &body).with_context(|| format!("failed to write {path}"))?;
        path.to_string()
    };

    debug!(path = %written, rows = rows.len(), gzip, "Error table written");
    Ok(written)
}

/// Serializes the run summary as pretty-printed JSON.
pub fn write_summary(path: &str, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    serde_json::to_writer_pretty(file, summary)?;
    debug!(path, "Run summary written");
    Ok(())
}

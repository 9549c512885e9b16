//! CSV ingestion for count data and run side inputs.
//!
//! Everything here is thin I/O: parse the semicolon-delimited export of the
//! count program, restrict it to the analysis period, and group records per
//! intersection. The estimation stages never touch files.

use std::collections::{HashMap, HashSet};
use std::fs::File;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analyzers::types::CountRecord;

/// One raw row of the count export. Columns not listed here, such as the
/// sensor coordinates, are dropped on read.
#[derive(Debug, Deserialize)]
struct RawRow {
    name: String,
    date: String,
    time: String,
    #[serde(rename = "ped_N")]
    ped_n: u32,
    #[serde(rename = "ped_S")]
    ped_s: u32,
    #[serde(rename = "ped_W")]
    ped_w: u32,
    #[serde(rename = "ped_E")]
    ped_e: u32,
    vol_vehicle: u32,
}

/// All count records of the analysis period, grouped per intersection and
/// sorted by timestamp.
#[derive(Debug, Default)]
pub struct CountTable {
    series: HashMap<String, Vec<CountRecord>>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

impl CountTable {
    pub fn series(&self, intersection: &str) -> Option<&[CountRecord]> {
        self.series.get(intersection).map(Vec::as_slice)
    }

    /// Intersection names present in the data, sorted for stable listings.
    pub fn intersection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn record_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
    Some(date.and_time(time))
}

/// Loads the semicolon-delimited count table, keeping rows whose calendar
/// date falls inside `[start_date, end_date]`, both ends included.
///
/// Rows that fail to parse are counted and skipped rather than failing the
/// run; a year of sensor data always has a few mangled lines.
pub fn load_counts(path: &str, start_date: NaiveDate, end_date: NaiveDate) -> Result<CountTable> {
    let file =
        File::open(path).with_context(|| format!("failed to open count data at {path}"))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut table = CountTable::default();

    for (row_index, row) in reader.deserialize::<RawRow>().enumerate() {
        table.rows_read += 1;
        // Data rows start on line 2, after the header.
        let line = row_index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                table.rows_skipped += 1;
                debug!(line, error = %e, "Skipping unreadable row");
                continue;
            }
        };
        let Some(timestamp) = parse_timestamp(&row.date, &row.time) else {
            table.rows_skipped += 1;
            debug!(line, date = %row.date, time = %row.time, "Skipping row with bad timestamp");
            continue;
        };
        let day = timestamp.date();
        if day < start_date || day > end_date {
            continue;
        }

        table.series.entry(row.name).or_default().push(CountRecord {
            timestamp,
            ped_n: row.ped_n,
            ped_s: row.ped_s,
            ped_w: row.ped_w,
            ped_e: row.ped_e,
            vehicles: row.vol_vehicle,
        });
    }

    for series in table.series.values_mut() {
        series.sort_by_key(|record| record.timestamp);
    }

    if table.rows_skipped > 0 {
        warn!(
            skipped = table.rows_skipped,
            read = table.rows_read,
            path,
            "Some rows could not be parsed"
        );
    }
    debug!(
        intersections = table.series.len(),
        records = table.record_count(),
        "Count table loaded"
    );

    Ok(table)
}

/// Loads the intersection allow-list: a header line followed by one
/// intersection name per row.
pub fn load_intersections(path: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open intersection list at {path}"))?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("bad row in intersection list {path}"))?;
        if let Some(name) = record.get(0) {
            let name = name.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Loads the holiday list: a header line followed by one `%Y-%m-%d` date per
/// row. Unlike count rows, a malformed holiday fails the run; the list is
/// small and curated by hand.
pub fn load_holidays(path: &str) -> Result<HashSet<NaiveDate>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open holiday list at {path}"))?;

    let mut holidays = HashSet::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("bad row in holiday list {path}"))?;
        let Some(field) = record.get(0) else {
            continue;
        };
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        match NaiveDate::parse_from_str(field, "%Y-%m-%d") {
            Ok(date) => {
                holidays.insert(date);
            }
            Err(_) => bail!("{field:?} in holiday list {path} is not a %Y-%m-%d date"),
        }
    }
    Ok(holidays)
}

//! Behavior table writer
//!
//! Each behavior goes to `cumulative_<behavior>_times.csv`. A missing file is
//! created with a header row; an existing file only gets rows appended, so
//! repeated runs over the same logs accumulate duplicate rows.

use crate::error::AggregateError;
use crate::types::{BehaviorTable, TableOutcome, WriteMode};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

/// Prefix of every output table name
pub const OUTPUT_PREFIX: &str = "cumulative_";

/// Suffix of every output table name
pub const OUTPUT_SUFFIX: &str = "_times.csv";

/// Name of the leading column in every output table
pub const VIDEO_COLUMN: &str = "video_name";

/// File name for a behavior's table.
///
/// Path separators and `%` are percent-escaped, so distinct behaviors always
/// get distinct file names.
pub fn output_file_name(behavior: &str) -> String {
    let mut safe = String::with_capacity(behavior.len());
    for c in behavior.chars() {
        match c {
            '%' => safe.push_str("%25"),
            '/' => safe.push_str("%2F"),
            '\\' => safe.push_str("%5C"),
            _ => safe.push(c),
        }
    }
    format!("{OUTPUT_PREFIX}{safe}{OUTPUT_SUFFIX}")
}

/// Whether `name` looks like a table written by [`write_table`]
pub fn is_output_file_name(name: &str) -> bool {
    name.len() > OUTPUT_PREFIX.len() + OUTPUT_SUFFIX.len()
        && name.starts_with(OUTPUT_PREFIX)
        && name.ends_with(OUTPUT_SUFFIX)
}

/// Write or append one behavior table into `dir`
pub fn write_table(
    dir: &Path,
    table: &BehaviorTable,
    labels: &[String],
) -> Result<TableOutcome, AggregateError> {
    let path = dir.join(output_file_name(&table.behavior));
    let mode = if path.exists() {
        WriteMode::Appended
    } else {
        WriteMode::Created
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| AggregateError::io(&path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    if mode == WriteMode::Created {
        let mut header = Vec::with_capacity(labels.len() + 1);
        header.push(VIDEO_COLUMN);
        header.extend(labels.iter().map(String::as_str));
        writer.write_record(&header)?;
    }

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.video_id.clone());
        record.extend(row.values.iter().map(|&v| format_seconds(v)));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| AggregateError::io(&path, e))?;

    info!(
        behavior = %table.behavior,
        path = %path.display(),
        rows = table.rows.len(),
        ?mode,
        "wrote behavior table"
    );

    Ok(TableOutcome {
        behavior: table.behavior.clone(),
        path,
        mode,
        rows_written: table.rows.len(),
    })
}

/// Render seconds for output: integral values keep one decimal (`50.0`),
/// everything else uses the shortest exact representation.
pub fn format_seconds(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

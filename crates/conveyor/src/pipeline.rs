//! Line-oriented conversion driver.
//!
//! Reads one JSON release record per line and writes one JSON
//! [`WarehouseRelease`](crate::release::WarehouseRelease) per converted
//! record. Records that fail are logged and skipped so a single bad release
//! never stops a sync.

use crate::config::WarehouseConfig;
use crate::error::Result;
use crate::release::convert_release;
use serde_json::{Map, Value};
use std::io::{BufRead, Write};

/// Counts of records seen by [`convert_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts every record read from `input`, writing results to `output`.
///
/// Blank lines are ignored. Only I/O errors on either stream abort the run.
pub fn convert_lines<R, W>(
    input: R,
    mut output: W,
    warehouse: &WarehouseConfig,
) -> Result<ConversionSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = ConversionSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match convert_line(&line, warehouse) {
            Ok(json) => {
                writeln!(output, "{json}")?;
                summary.converted += 1;
            }
            Err(e) => {
                tracing::error!("Failed to convert record on line {}: {}", index + 1, e);
                summary.failed += 1;
            }
        }
    }

    output.flush()?;
    Ok(summary)
}

fn convert_line(line: &str, warehouse: &WarehouseConfig) -> Result<String> {
    let record: Map<String, Value> = serde_json::from_str(line)?;
    let release = convert_release(record, warehouse)?;
    Ok(serde_json::to_string(&release)?)
}

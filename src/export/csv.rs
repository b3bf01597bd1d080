use std::io::Write;

use crate::domain::FlatRow;
use crate::error::Result;

/// CSV with a header of [`FlatRow::COLUMNS`]. No rows produce an empty file.
pub fn write_csv<W: Write>(rows: &[FlatRow], out: W) -> Result<usize> {
    if rows.is_empty() {
        tracing::warn!("No rows to export to CSV.");
        return Ok(0);
    }
    let mut writer = ::csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

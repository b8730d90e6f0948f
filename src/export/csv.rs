//! Quoted CSV export: `name,lat,lon,orientation_deg,deviation_deg`

use crate::reconcile::OrientationRow;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 5] = ["name", "lat", "lon", "orientation_deg", "deviation_deg"];

fn quoted_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(inner)
}

/// Header plus one record per row; every field is quoted
pub fn write_csv<W: Write>(writer: &mut Writer<W>, rows: &[OrientationRow]) -> Result<()> {
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.name.clone(),
            format!("{:.6}", row.center_lat),
            format!("{:.6}", row.center_lon),
            format!("{:.1}", row.orientation_deg),
            format!("{:.1}", row.deviation_deg),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn rows_to_csv(rows: &[OrientationRow]) -> Result<String> {
    let mut writer = quoted_writer(Vec::new());
    write_csv(&mut writer, rows)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to finish CSV buffer: {}", err))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

pub fn export_csv_file<P: AsRef<Path>>(rows: &[OrientationRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = quoted_writer(file);
    write_csv(&mut writer, rows).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

use crate::audit::DecayReport;
use crate::error::Error;
use crate::report::DisplayRow;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write the decaying rows, already in report order, as CSV with a header.
pub fn write_csv<W: Write>(report: &DecayReport, writer: W) -> Result<usize, Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &report.rows {
        csv_writer.serialize(DisplayRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(report.rows.len())
}

pub fn write_csv_file(report: &DecayReport, path: &Path) -> Result<usize, Error> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(report, file)?;
    info!("Exported {} decaying items to {}", written, path.display());
    Ok(written)
}

//! CSV export of scheduled injections.
//!
//! Writes a schedule as one row per injection so it can be imported into a
//! spreadsheet or calendar tool.

use crate::{Result, ScheduledInjection};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    peptide_id: String,
    peptide_name: String,
    scheduled_time: String,
    dose: f64,
    unit: String,
    status: String,
    completed_at: Option<String>,
}

impl From<&ScheduledInjection> for CsvRow {
    fn from(injection: &ScheduledInjection) -> Self {
        CsvRow {
            id: injection.id.to_string(),
            peptide_id: injection.peptide_id.clone(),
            peptide_name: injection.peptide_name.clone(),
            scheduled_time: injection.scheduled_time.to_rfc3339(),
            dose: injection.dose,
            unit: injection.unit.to_string(),
            status: injection.status.to_string(),
            completed_at: injection.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Write injections to `csv_path`, replacing any existing file
///
/// Returns the number of rows written.
pub fn write_schedule_csv(injections: &[ScheduledInjection], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);

    for injection in injections {
        writer.serialize(CsvRow::from(injection))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} injections to {:?}", injections.len(), csv_path);
    Ok(injections.len())
}

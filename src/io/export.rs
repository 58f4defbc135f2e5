//! CSV export for panel history, loads, metrics, and simulated days.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::metrics::PanelReport;
use crate::panel::state::SystemState;
use crate::sim::day::DayRecord;

/// Column header for history export.
const HISTORY_HEADER: &str = "day_offset,kwh";

/// Column header for load export.
const LOADS_HEADER: &str = "id,name,power_w,is_on,essential";

/// Column header for simulated-day export.
const DAYS_HEADER: &str = "date,kwh,cycle_days_elapsed,bill_to_date";

/// Exports the consumption history to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_history_csv(state: &SystemState, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_history_csv(state, io::BufWriter::new(file))
}

/// Exports a single metrics report to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_report_csv(report: &PanelReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_report_csv(report, io::BufWriter::new(file))
}

/// Exports the load table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_loads_csv(state: &SystemState, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_loads_csv(state, io::BufWriter::new(file))
}

/// Exports simulated days to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_days_csv(days: &[DayRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_days_csv(days, io::BufWriter::new(file))
}

/// Writes the consumption history, oldest first.
///
/// `day_offset` counts back from the most recent day, which is `0`.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_history_csv(state: &SystemState, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HISTORY_HEADER.split(','))?;

    let history = state.consumption_history();
    let newest = history.len().saturating_sub(1);
    for (idx, kwh) in history.iter().enumerate() {
        let offset = idx as i64 - newest as i64;
        wtr.write_record(&[offset.to_string(), format!("{kwh:.3}")])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes every registered load in id order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_loads_csv(state: &SystemState, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(LOADS_HEADER.split(','))?;

    for load in state.loads() {
        wtr.write_record(&[
            load.id.clone(),
            load.display_name.clone(),
            format!("{:.1}", load.rated_power_w()),
            load.is_on.to_string(),
            state.is_essential(&load.id).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the report as a header row plus one value row, columns named after its fields.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_report_csv(report: &PanelReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.serialize(report)?;
    wtr.flush()?;
    Ok(())
}

/// Writes one row per simulated day.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_days_csv(days: &[DayRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAYS_HEADER.split(','))?;

    for d in days {
        wtr.write_record(&[
            d.date.to_string(),
            format!("{:.3}", d.kwh),
            d.cycle_days_elapsed.to_string(),
            format!("{:.2}", d.bill_to_date),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

//! High-level pipeline: timetable file in, faculty workbook out.
//!
//! # Example
//!
//! ```rust,ignore
//! use timetable_splitter::{process_timetable, Settings};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = process_timetable(
//!         Path::new("timetable.xlsx"),
//!         Path::new("faculty.xlsx"),
//!         &Settings::default(),
//!     )?;
//!     println!("Wrote {} faculty sheets", report.faculty_count);
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::Path;

use crate::config::Settings;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_success_indent, log_warning};
use crate::metrics::{summarize, FacultySummary};
use crate::roles::{resolve_roles, ColumnRoles};
use crate::table::{read_table, RawTable, TableSource};
use crate::workbook::{assemble_workbook, OutputWorkbook};
use crate::writer::{write_workbook, WriterOptions};

/// Result of transforming an in-memory table.
#[derive(Debug, Clone, Serialize)]
pub struct TransformOutcome {
    pub roles: ColumnRoles,
    pub summaries: Vec<FacultySummary>,
    pub workbook: OutputWorkbook,
    /// Rows left out because their faculty value is missing.
    pub skipped_rows: usize,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub row_count: usize,
    pub faculty_count: usize,
    pub skipped_rows: usize,
    pub sheet_names: Vec<String>,
}

/// Transform a table into the output workbook model.
///
/// Pure apart from logging: no files are touched.
pub fn transform_table(table: &RawTable, settings: &Settings) -> PipelineResult<TransformOutcome> {
    let roles = resolve_roles(table.headers())?;
    match &roles.duration {
        Some(column) => log_info_indent(format!("Duration column: {}", column.name), 1),
        None => log_info_indent("No duration column, counting 1 hour per session", 1),
    }

    let summaries = summarize(table, &roles);
    let grouped_rows: usize = summaries.iter().map(|s| s.group.len()).sum();
    let skipped_rows = table.row_count() - grouped_rows;

    log_success(format!("{} faculty members", summaries.len()));
    if skipped_rows > 0 {
        log_warning(format!("{} rows without a faculty value skipped", skipped_rows));
    }

    let workbook = assemble_workbook(table, &summaries, settings);
    for (sheet, summary) in workbook.sheets.iter().zip(&summaries) {
        let m = &summary.metrics;
        log_success_indent(
            format!(
                "{}: {} hrs, {} sessions (UG {}, PG {})",
                sheet.name, m.total_hours, m.total_sessions, m.ug_sessions, m.pg_sessions
            ),
            1,
        );
    }

    Ok(TransformOutcome {
        roles,
        summaries,
        workbook,
        skipped_rows,
    })
}

/// Read `input`, split it by faculty and write the workbook to `output`.
pub fn process_timetable(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> PipelineResult<ProcessReport> {
    log_info(format!("📖 Reading timetable: {}", input.display()));
    let loaded = read_table(input)?;
    match &loaded.source {
        TableSource::Workbook { sheet } => log_success(format!("Worksheet: {}", sheet)),
        TableSource::Delimited { encoding, delimiter } => log_success(format!(
            "Encoding: {}, delimiter: '{}'",
            encoding,
            format_delimiter(*delimiter)
        )),
    }
    let table = loaded.table;
    log_success(format!(
        "Read {} rows, {} columns",
        table.row_count(),
        table.column_count()
    ));

    let outcome = transform_table(&table, settings)?;

    log_info(format!("💾 Writing workbook: {}", output.display()));
    write_workbook(&outcome.workbook, output, &WriterOptions::from(settings))?;
    log_success(format!("Advanced Academic Timetable generated: {}", output.display()));

    Ok(ProcessReport {
        row_count: table.row_count(),
        faculty_count: outcome.summaries.len(),
        skipped_rows: outcome.skipped_rows,
        sheet_names: outcome
            .workbook
            .sheet_names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

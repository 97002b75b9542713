//! Spreadsheet timetable reader (calamine).
//!
//! Only the first worksheet is read. Its first non-blank row is the header,
//! and columns are counted from A even when the leading ones are empty.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use std::path::Path;

use super::{CellValue, LoadedTable, RawTable, TableSource};
use crate::error::{TableError, TableResult};

/// Convert a calamine cell into a [`CellValue`].
pub fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) if f.is_nan() => CellValue::Empty,
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::from_text(s)),
        Data::DurationIso(s) => CellValue::from_text(s),
    }
}

/// Read the first worksheet of a spreadsheet file.
pub fn read_workbook_file<P: AsRef<Path>>(path: P) -> TableResult<LoadedTable> {
    let mut workbook = open_workbook_auto(path.as_ref())?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(TableError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet)?;

    // The range starts at the first used cell; blank columns before it still
    // count, so the first column stays column A.
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let convert_row = |row: &[Data]| -> Vec<CellValue> {
        std::iter::repeat(CellValue::Empty)
            .take(leading_columns)
            .chain(row.iter().map(convert_cell))
            .collect()
    };

    let mut rows = range.rows();
    let header_cells = convert_row(rows.next().ok_or(TableError::EmptyFile)?);

    if header_cells.is_empty() {
        return Err(TableError::NoColumns);
    }

    let data_rows = rows.map(convert_row).collect();

    Ok(LoadedTable {
        table: RawTable::new(header_cells, data_rows),
        source: TableSource::Workbook { sheet },
    })
}

//! XLSX serialization of an [`OutputWorkbook`] (rust_xlsxwriter).
//!
//! The whole workbook is laid out in memory and saved once, so a failure
//! while writing cells never leaves a half-written file on disk.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use crate::config::Settings;
use crate::error::{WriteError, WriteResult};
use crate::table::CellValue;
use crate::workbook::{OutputWorkbook, SheetKind, SheetModel};

/// Worksheet row limit.
pub const MAX_ROWS: usize = 1_048_576;

/// Worksheet column limit.
pub const MAX_COLUMNS: usize = 16_384;

/// Columns A:Z receive the configured width on faculty sheets.
const STYLED_COLUMNS: u16 = 26;

const TITLE_BACKGROUND: u32 = 0xD7E4BC;
const METRIC_FONT: u32 = 0x215967;

/// Serialization options.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterOptions {
    /// Stamped as the document creation date so output is reproducible.
    pub creation_date: NaiveDate,
}

impl From<&Settings> for WriterOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            creation_date: settings.creation_date,
        }
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions::from(&Settings::default())
    }
}

/// Cell formats shared by every sheet.
struct SheetFormats {
    title: Format,
    metric_label: Format,
    header: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(TITLE_BACKGROUND))
                .set_border(FormatBorder::Thin),
            metric_label: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(METRIC_FONT)),
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
        }
    }

    /// Format for a preamble cell, if it has one.
    fn preamble(&self, kind: SheetKind, row: usize, col: usize) -> Option<&Format> {
        match (kind, row, col) {
            (SheetKind::Faculty, 0, 0) => Some(&self.title),
            (SheetKind::Faculty, _, 0) => Some(&self.metric_label),
            _ => None,
        }
    }
}

/// Lay out the workbook in memory.
pub fn render_workbook(model: &OutputWorkbook, options: &WriterOptions) -> WriteResult<Workbook> {
    let mut workbook = Workbook::new();

    let date = &options.creation_date;
    let created = ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let formats = SheetFormats::new();
    for sheet in &model.sheets {
        check_size(sheet)?;
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &formats)?;
    }

    Ok(workbook)
}

/// Serialize the workbook to bytes.
pub fn workbook_bytes(model: &OutputWorkbook, options: &WriterOptions) -> WriteResult<Vec<u8>> {
    let mut workbook = render_workbook(model, options)?;
    Ok(workbook.save_to_buffer()?)
}

/// Serialize the workbook to `path`.
pub fn write_workbook<P: AsRef<Path>>(
    model: &OutputWorkbook,
    path: P,
    options: &WriterOptions,
) -> WriteResult<()> {
    let mut workbook = render_workbook(model, options)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

fn check_size(sheet: &SheetModel) -> WriteResult<()> {
    let rows = sheet.height();
    let columns = sheet.width();
    if rows > MAX_ROWS || columns > MAX_COLUMNS {
        return Err(WriteError::SheetTooLarge {
            sheet: sheet.name.clone(),
            rows,
            columns,
        });
    }
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetModel, formats: &SheetFormats) -> WriteResult<()> {
    worksheet.set_name(&sheet.name)?;

    for (r, row) in sheet.preamble.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let format = formats.preamble(sheet.kind, r, c);
            write_cell(worksheet, r as u32, c as u16, value, format)?;
        }
    }

    let header_row = sheet.data.start_row;
    for (c, column) in sheet.data.columns.iter().enumerate() {
        worksheet.write_string_with_format(header_row, c as u16, column, &formats.header)?;
    }

    for (i, row) in sheet.data.rows.iter().enumerate() {
        let r = header_row + 1 + i as u32;
        for (c, value) in row.iter().enumerate() {
            write_cell(worksheet, r, c as u16, value, None)?;
        }
    }

    if let Some(width) = sheet.column_width {
        for col in 0..STYLED_COLUMNS {
            worksheet.set_column_width(col, width)?;
        }
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> WriteResult<()> {
    match (value, format) {
        (CellValue::Empty, None) => {}
        (CellValue::Empty, Some(f)) => {
            worksheet.write_blank(row, col, f)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellValue::Text(s), Some(f)) => {
            worksheet.write_string_with_format(row, col, s, f)?;
        }
        (CellValue::Int(i), None) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        (CellValue::Int(i), Some(f)) => {
            worksheet.write_number_with_format(row, col, *i as f64, f)?;
        }
        (CellValue::Float(x), None) => {
            worksheet.write_number(row, col, *x)?;
        }
        (CellValue::Float(x), Some(f)) => {
            worksheet.write_number_with_format(row, col, *x, f)?;
        }
        (CellValue::Bool(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (CellValue::Bool(b), Some(f)) => {
            worksheet.write_boolean_with_format(row, col, *b, f)?;
        }
        (CellValue::DateTime(_), None) => {
            worksheet.write_string(row, col, value.to_text())?;
        }
        (CellValue::DateTime(_), Some(f)) => {
            worksheet.write_string_with_format(row, col, value.to_text(), f)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{calendar_sheet, DataBlock, CALENDAR_SHEET};
    use calamine::{open_workbook_auto, Data, Reader};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn faculty_model() -> OutputWorkbook {
        let faculty = SheetModel {
            name: "Dr. Lee".into(),
            kind: SheetKind::Faculty,
            preamble: vec![
                vec![text("Faculty Profile")],
                vec![text("Faculty Member"), text("Dr. Lee")],
                vec![text("Total Contact Hours"), text("1.5 hrs/week")],
                vec![text("Academic Level"), text("PG")],
            ],
            data: DataBlock {
                start_row: 5,
                columns: vec!["Faculty".into(), "Duration".into(), "Room".into()],
                rows: vec![vec![text("Dr. Lee"), text("1.5 hours"), CellValue::Empty]],
            },
            column_width: Some(18.0),
        };
        OutputWorkbook {
            sheets: vec![faculty, calendar_sheet()],
        }
    }

    fn cell(range: &calamine::Range<Data>, row: u32, col: u32) -> Option<Data> {
        range.get_value((row, col)).cloned()
    }

    #[test]
    fn test_written_file_reopens_with_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_workbook(&faculty_model(), &path, &WriterOptions::default()).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Dr. Lee".to_string(), CALENDAR_SHEET.to_string()]);

        let range = workbook.worksheet_range("Dr. Lee").unwrap();
        assert_eq!(cell(&range, 0, 0), Some(Data::String("Faculty Profile".into())));
        assert_eq!(cell(&range, 1, 1), Some(Data::String("Dr. Lee".into())));
        assert_eq!(cell(&range, 3, 1), Some(Data::String("PG".into())));
        assert_eq!(cell(&range, 5, 0), Some(Data::String("Faculty".into())));
        assert_eq!(cell(&range, 6, 1), Some(Data::String("1.5 hours".into())));

        let calendar = workbook.worksheet_range(CALENDAR_SHEET).unwrap();
        assert_eq!(cell(&calendar, 0, 1), Some(Data::String("Occasion".into())));
        assert_eq!(cell(&calendar, 4, 0), Some(Data::String("2026-04-10".into())));
    }

    #[test]
    fn test_numbers_written_as_numbers() {
        let sheet = SheetModel {
            name: "Numbers".into(),
            kind: SheetKind::Summary,
            preamble: Vec::new(),
            data: DataBlock {
                start_row: 0,
                columns: vec!["Hours".into(), "Sessions".into(), "Flag".into()],
                rows: vec![vec![CellValue::Float(3.5), CellValue::Int(2), CellValue::Bool(true)]],
            },
            column_width: None,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.xlsx");
        write_workbook(&OutputWorkbook { sheets: vec![sheet] }, &path, &WriterOptions::default())
            .unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range("Numbers").unwrap();
        assert_eq!(cell(&range, 1, 0), Some(Data::Float(3.5)));
        assert_eq!(cell(&range, 1, 1), Some(Data::Float(2.0)));
        assert_eq!(cell(&range, 1, 2), Some(Data::Bool(true)));
    }

    #[test]
    fn test_output_is_reproducible() {
        let options = WriterOptions::default();
        let first = workbook_bytes(&faculty_model(), &options).unwrap();
        let second = workbook_bytes(&faculty_model(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_sheet_rejected() {
        let mut model = faculty_model();
        model.sheets[0].data.start_row = MAX_ROWS as u32;

        match render_workbook(&model, &WriterOptions::default()) {
            Err(WriteError::SheetTooLarge { sheet, .. }) => assert_eq!(sheet, "Dr. Lee"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("oversized sheet was accepted"),
        }
    }

    #[test]
    fn test_failed_layout_leaves_no_file() {
        let mut model = faculty_model();
        model.sheets[1].data.start_row = MAX_ROWS as u32;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.xlsx");
        assert!(write_workbook(&model, &path, &WriterOptions::default()).is_err());
        assert!(!path.exists());
    }
}

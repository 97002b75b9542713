//! Raw timetable tables and the readers that produce them.
//!
//! A [`RawTable`] is the input exactly as found: ordered column names plus
//! ordered rows of loosely typed [`CellValue`]s. Nothing here knows about
//! faculty or sessions.
//!
//! Supported inputs:
//! - Spreadsheets (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`): first worksheet, first row is the header
//! - Delimited text (`.csv`, `.tsv`, `.txt`): encoding and delimiter auto-detected

pub mod csv_reader;
pub mod xlsx_reader;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{TableError, TableResult};

pub use csv_reader::{decode_content, detect_delimiter, detect_encoding, parse_delimited, read_delimited_file};
pub use xlsx_reader::read_workbook_file;

/// Text values read as missing, in addition to blank cells.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One cell of the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Build a cell from source text, mapping NA markers to `Empty`.
    pub fn from_text(text: &str) -> Self {
        if NA_MARKERS.contains(&text) {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    /// Build a cell from delimited text, recognising numbers and booleans.
    pub fn infer(text: &str) -> Self {
        match Self::from_text(text) {
            CellValue::Text(s) => {
                if let Ok(i) = s.parse::<i64>() {
                    return CellValue::Int(i);
                }
                if s.bytes().any(|b| b.is_ascii_digit()) {
                    if let Ok(f) = s.parse::<f64>() {
                        if f.is_finite() {
                            return CellValue::Float(f);
                        }
                    }
                }
                match s.to_lowercase().as_str() {
                    "true" => CellValue::Bool(true),
                    "false" => CellValue::Bool(false),
                    _ => CellValue::Text(s),
                }
            }
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Textual form used for keyword tests and numeric extraction.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::DateTime(dt) => dt.format(DATETIME_DISPLAY).to_string(),
        }
    }

    /// Hashable identity used for grouping, `None` for missing values.
    ///
    /// Integral floats share a key with the equal integer.
    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(GroupKey::Text(s.clone())),
            CellValue::Int(i) => Some(GroupKey::Int(*i)),
            CellValue::Float(f) if f.is_nan() => None,
            CellValue::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(GroupKey::Int(*f as i64))
                } else {
                    Some(GroupKey::Float(f.to_bits()))
                }
            }
            CellValue::Bool(b) => Some(GroupKey::Bool(*b)),
            CellValue::DateTime(dt) => Some(GroupKey::DateTime(*dt)),
        }
    }
}

/// Equality class of a non-missing cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Text(String),
    Int(i64),
    Float(u64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// Input table: unique column names and rectangular rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table from a header row and data rows.
    ///
    /// Headers are trimmed, blank ones become `Unnamed: <index>` and repeats
    /// get `.1`, `.2`, ... suffixes. Rows are padded or cut to the header
    /// width and fully blank rows are dropped.
    pub fn new(header_cells: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = normalize_headers(&header_cells);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// Build a table from string headers and rows.
    pub fn from_rows<H: AsRef<str>>(headers: &[H], rows: Vec<Vec<CellValue>>) -> Self {
        let header_cells = headers
            .iter()
            .map(|h| CellValue::Text(h.as_ref().to_string()))
            .collect();
        Self::new(header_cells, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, column); out-of-range positions read as `Empty`.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(cells.len());

    for (index, cell) in cells.iter().enumerate() {
        let text = cell.to_text().trim().to_string();
        let base = if text.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            text
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Where a table was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableSource {
    Workbook { sheet: String },
    Delimited { encoding: String, delimiter: char },
}

/// A table plus its source metadata.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: RawTable,
    pub source: TableSource,
}

/// Read a timetable, choosing the reader from the file extension.
pub fn read_table<P: AsRef<Path>>(path: P) -> TableResult<LoadedTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam" | "ods" => read_workbook_file(path),
        "csv" | "tsv" | "txt" => read_delimited_file(path),
        _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
    }
}

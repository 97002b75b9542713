//! Delimited-text timetable reader with encoding and delimiter auto-detection.

use std::path::Path;

use super::{CellValue, LoadedTable, RawTable, TableSource};
use crate::error::{TableError, TableResult};

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always taken as UTF-8; chardet only guesses for the rest.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown labels fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse decoded delimited text into a table.
///
/// The first record is the header row. Records may be ragged.
pub fn parse_delimited(content: &str, delimiter: char) -> TableResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header_record = match records.next() {
        Some(record) => record?,
        None => return Err(TableError::EmptyFile),
    };
    let header_cells: Vec<CellValue> = header_record
        .iter()
        .map(|h| CellValue::Text(h.to_string()))
        .collect();

    if header_cells.is_empty() {
        return Err(TableError::NoColumns);
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Ok(RawTable::new(header_cells, rows))
}

/// Read a delimited file with auto-detection of encoding and delimiter.
pub fn read_delimited_file<P: AsRef<Path>>(path: P) -> TableResult<LoadedTable> {
    let bytes = std::fs::read(path.as_ref())?;
    read_delimited_bytes(&bytes)
}

/// Read delimited bytes with auto-detection of encoding and delimiter.
pub fn read_delimited_bytes(bytes: &[u8]) -> TableResult<LoadedTable> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(TableError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_delimited(&content, delimiter)?;

    Ok(LoadedTable {
        table,
        source: TableSource::Delimited { encoding, delimiter },
    })
}

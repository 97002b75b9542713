//! In-memory output workbook and the assembler that builds it.
//!
//! Sheet order is fixed: one sheet per faculty (first-seen order), then
//! [`SUMMARY_SHEET`], then [`CALENDAR_SHEET`]. Nothing in this module talks to
//! a spreadsheet library; see [`crate::writer`] for serialization.

use serde::Serialize;
use std::collections::HashSet;

use crate::config::Settings;
use crate::metrics::FacultySummary;
use crate::table::{CellValue, RawTable};

pub const SUMMARY_SHEET: &str = "University Summary";
pub const CALENDAR_SHEET: &str = "Academic Calendar";
pub const PROFILE_TITLE: &str = "Faculty Profile";

/// Maximum sheet name length accepted by spreadsheet applications.
pub const SHEET_NAME_MAX_CHARS: usize = 31;

/// Characters stripped from faculty values to form sheet names.
pub const FORBIDDEN_SHEET_CHARS: &[char] = &[':', '/', '?', '*', '[', ']', '\\'];

pub const SUMMARY_COLUMNS: [&str; 5] = [
    "Faculty Name",
    "Total Weekly Hours",
    "UG Sessions",
    "PG Sessions",
    "Total Sessions",
];

pub const CALENDAR_COLUMNS: [&str; 3] = ["Date", "Occasion", "Status"];

/// Holiday reference for the 2026 academic year: (date, occasion, status).
pub const ACADEMIC_HOLIDAYS: [(&str, &str, &str); 4] = [
    ("2026-01-01", "New Year", "Public Holiday"),
    ("2026-01-26", "Republic Day", "Academic Holiday"),
    ("2026-03-25", "Holi", "Restricted Holiday"),
    ("2026-04-10", "Good Friday", "Public Holiday"),
];

/// What a sheet contains; drives styling in the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetKind {
    Faculty,
    Summary,
    Calendar,
}

/// Tabular block: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBlock {
    /// Zero-based row of the column headers.
    pub start_row: u32,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// One output sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetModel {
    pub name: String,
    pub kind: SheetKind,
    /// Rows written from the top of the sheet, before the data block.
    pub preamble: Vec<Vec<CellValue>>,
    pub data: DataBlock,
    /// Width for columns A:Z, if set.
    pub column_width: Option<f64>,
}

impl SheetModel {
    /// Number of sheet rows the model occupies.
    pub fn height(&self) -> usize {
        let data_end = self.data.start_row as usize + 1 + self.data.rows.len();
        data_end.max(self.preamble.len())
    }

    /// Widest row of the model.
    pub fn width(&self) -> usize {
        let data_width = self
            .data
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.data.columns.len()));
        self.preamble.iter().map(Vec::len).chain(data_width).max().unwrap_or(0)
    }
}

/// The complete output, in sheet order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputWorkbook {
    pub sheets: Vec<SheetModel>,
}

impl OutputWorkbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetModel> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

// =============================================================================
// Sheet names
// =============================================================================

/// Derive a sheet name from a faculty value.
///
/// Forbidden characters are removed (not replaced), the result is cut to 31
/// characters, and an empty result becomes "Unknown". Leading and trailing
/// apostrophes are also dropped since workbooks reject them.
pub fn sanitize_sheet_name(value: &str) -> String {
    let stripped: String = value
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .collect();
    let truncated: String = stripped
        .trim_matches('\'')
        .chars()
        .take(SHEET_NAME_MAX_CHARS)
        .collect();
    let name = truncated.trim_matches('\'');

    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

/// Hands out unique sheet names.
///
/// Names compare case-insensitively. A taken name gets a ` (2)`, ` (3)`, ...
/// suffix, shortening the base so the whole name stays within 31 characters.
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as used without checking it.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Return `base` or the first free suffixed variant, and mark it used.
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_lowercase()) {
            return base.to_string();
        }

        let mut n = 2usize;
        loop {
            let suffix = format!(" ({})", n);
            let keep = SHEET_NAME_MAX_CHARS.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Render hours for the profile block: `3`, `1.5`.
pub fn format_hours(hours: f64) -> String {
    format!("{} hrs/week", hours)
}

fn text(s: impl Into<String>) -> CellValue {
    CellValue::Text(s.into())
}

fn count(n: usize) -> CellValue {
    CellValue::Int(n as i64)
}

/// Build the sheet for one faculty.
pub fn faculty_sheet(
    name: String,
    table: &RawTable,
    summary: &FacultySummary,
    settings: &Settings,
) -> SheetModel {
    let metrics = &summary.metrics;
    let level = metrics.academic_level(settings.level_fallback);

    let preamble = vec![
        vec![text(PROFILE_TITLE)],
        vec![text("Faculty Member"), summary.group.faculty.clone()],
        vec![text("Total Contact Hours"), text(format_hours(metrics.total_hours))],
        vec![text("Academic Level"), text(level.label())],
    ];

    let rows = summary
        .group
        .rows
        .iter()
        .filter_map(|&i| table.rows().get(i).cloned())
        .collect();

    SheetModel {
        name,
        kind: SheetKind::Faculty,
        preamble,
        data: DataBlock {
            start_row: settings.data_start_row,
            columns: table.headers().to_vec(),
            rows,
        },
        column_width: Some(settings.column_width),
    }
}

/// Build the per-faculty summary sheet.
pub fn summary_sheet(summaries: &[FacultySummary]) -> SheetModel {
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.group.faculty.clone(),
                CellValue::Float(s.metrics.total_hours),
                count(s.metrics.ug_sessions),
                count(s.metrics.pg_sessions),
                count(s.metrics.total_sessions),
            ]
        })
        .collect();

    SheetModel {
        name: SUMMARY_SHEET.to_string(),
        kind: SheetKind::Summary,
        preamble: Vec::new(),
        data: DataBlock {
            start_row: 0,
            columns: SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        },
        column_width: None,
    }
}

/// Build the static holiday sheet.
pub fn calendar_sheet() -> SheetModel {
    let rows = ACADEMIC_HOLIDAYS
        .iter()
        .map(|(date, occasion, status)| vec![text(*date), text(*occasion), text(*status)])
        .collect();

    SheetModel {
        name: CALENDAR_SHEET.to_string(),
        kind: SheetKind::Calendar,
        preamble: Vec::new(),
        data: DataBlock {
            start_row: 0,
            columns: CALENDAR_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        },
        column_width: None,
    }
}

/// Assemble the full output workbook.
pub fn assemble_workbook(
    table: &RawTable,
    summaries: &[FacultySummary],
    settings: &Settings,
) -> OutputWorkbook {
    let mut namer = SheetNamer::new();
    namer.reserve(SUMMARY_SHEET);
    namer.reserve(CALENDAR_SHEET);

    let mut sheets: Vec<SheetModel> = summaries
        .iter()
        .map(|summary| {
            let base = sanitize_sheet_name(&summary.group.faculty.to_text());
            let name = namer.claim(&base);
            faculty_sheet(name, table, summary, settings)
        })
        .collect();

    sheets.push(summary_sheet(summaries));
    sheets.push(calendar_sheet());

    OutputWorkbook { sheets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelFallback;
    use crate::metrics::summarize;
    use crate::roles::resolve_roles;

    fn build(headers: &[&str], rows: &[&[&str]], settings: &Settings) -> OutputWorkbook {
        let table = RawTable::from_rows(
            headers,
            rows.iter()
                .map(|r| r.iter().map(|c| CellValue::from_text(c)).collect())
                .collect(),
        );
        let roles = resolve_roles(table.headers()).unwrap();
        let summaries = summarize(&table, &roles);
        assemble_workbook(&table, &summaries, settings)
    }

    #[test]
    fn test_sanitize_strips_forbidden_characters() {
        assert_eq!(sanitize_sheet_name("A/B:C*D"), "ABCD");
        assert_eq!(sanitize_sheet_name("[Dr?] \\Lee"), "Dr Lee");
    }

    #[test]
    fn test_sanitize_truncates_after_stripping() {
        let long = format!("{}{}", "/".repeat(5), "x".repeat(40));
        assert_eq!(sanitize_sheet_name(&long), "x".repeat(31));

        let name = sanitize_sheet_name("Professor Venkataraghavan Subramanian");
        assert_eq!(name.chars().count(), 31);
        assert_eq!(name, "Professor Venkataraghavan Subra");
    }

    #[test]
    fn test_sanitize_counts_characters_not_bytes() {
        let name = sanitize_sheet_name(&"é".repeat(40));
        assert_eq!(name.chars().count(), 31);
    }

    #[test]
    fn test_sanitize_empty_becomes_unknown() {
        assert_eq!(sanitize_sheet_name(""), "Unknown");
        assert_eq!(sanitize_sheet_name("/:?*"), "Unknown");
        assert_eq!(sanitize_sheet_name("''"), "Unknown");
    }

    #[test]
    fn test_sanitize_trims_apostrophes() {
        assert_eq!(sanitize_sheet_name("'Dr. O'Neil'"), "Dr. O'Neil");
    }

    #[test]
    fn test_namer_disambiguates_case_insensitively() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.claim("Dr. Lee"), "Dr. Lee");
        assert_eq!(namer.claim("DR. LEE"), "DR. LEE (2)");
        assert_eq!(namer.claim("Dr. Lee"), "Dr. Lee (3)");
    }

    #[test]
    fn test_namer_keeps_suffixed_names_within_limit() {
        let mut namer = SheetNamer::new();
        let base = "x".repeat(31);
        assert_eq!(namer.claim(&base), base);
        let second = namer.claim(&base);
        assert_eq!(second, format!("{} (2)", "x".repeat(27)));
        assert_eq!(second.chars().count(), 31);
    }

    #[test]
    fn test_truncation_collisions_get_distinct_names() {
        // Both are 32 characters and share the first 31
        let a = "Department of Computer Science-A";
        let b = "Department of Computer Science-B";
        let wb = build(&["Faculty"], &[&[a], &[b]], &Settings::default());

        assert_eq!(
            wb.sheet_names(),
            vec![
                "Department of Computer Science-",
                "Department of Computer Scie (2)",
                SUMMARY_SHEET,
                CALENDAR_SHEET,
            ]
        );
    }

    #[test]
    fn test_reserved_names_are_not_reused() {
        let wb = build(&["Faculty"], &[&["University Summary"]], &Settings::default());
        assert_eq!(wb.sheet_names()[0], "University Summary (2)");
        assert_eq!(wb.sheet_names()[1], SUMMARY_SHEET);
    }

    #[test]
    fn test_faculty_sheet_layout() {
        let wb = build(
            &["Faculty", "Duration", "Level"],
            &[
                &["Dr. Smith", "1 hour", "UG"],
                &["Dr. Smith", "2 hours", "UG"],
                &["Dr. Lee", "1.5 hours", "PG"],
            ],
            &Settings::default(),
        );

        let smith = wb.sheet("Dr. Smith").unwrap();
        assert_eq!(smith.kind, SheetKind::Faculty);
        assert_eq!(smith.preamble[0], vec![text("Faculty Profile")]);
        assert_eq!(smith.preamble[1], vec![text("Faculty Member"), text("Dr. Smith")]);
        assert_eq!(smith.preamble[2], vec![text("Total Contact Hours"), text("3 hrs/week")]);
        assert_eq!(smith.preamble[3], vec![text("Academic Level"), text("UG")]);
        assert_eq!(smith.data.start_row, 5);
        assert_eq!(smith.data.columns, vec!["Faculty", "Duration", "Level"]);
        assert_eq!(smith.data.rows.len(), 2);
        assert_eq!(smith.data.rows[1][1], text("2 hours"));
        assert_eq!(smith.column_width, Some(18.0));
        assert_eq!(smith.height(), 8);
        assert_eq!(smith.width(), 3);

        let lee = wb.sheet("Dr. Lee").unwrap();
        assert_eq!(lee.preamble[2][1], text("1.5 hrs/week"));
        assert_eq!(lee.preamble[3][1], text("PG"));
    }

    #[test]
    fn test_level_fallback_policy() {
        let rows: &[&[&str]] = &[&["Dr. Rao", "Diploma"]];

        let wb = build(&["Faculty", "Level"], rows, &Settings::default());
        assert_eq!(wb.sheets[0].preamble[3][1], text("Unclassified"));

        let legacy = Settings { level_fallback: LevelFallback::Pg, ..Settings::default() };
        let wb = build(&["Faculty", "Level"], rows, &legacy);
        assert_eq!(wb.sheets[0].preamble[3][1], text("PG"));
    }

    #[test]
    fn test_mixed_level() {
        let wb = build(&["Faculty", "Level"], &[&["X", "UG/PG Combined"]], &Settings::default());
        assert_eq!(wb.sheets[0].preamble[3][1], text("Mixed"));
    }

    #[test]
    fn test_summary_sheet() {
        let wb = build(
            &["Faculty", "Duration", "Level"],
            &[
                &["Dr. Smith", "1 hour", "UG"],
                &["Dr. Smith", "2 hours", "UG"],
                &["Dr. Lee", "1.5 hours", "PG"],
            ],
            &Settings::default(),
        );

        let summary = wb.sheet(SUMMARY_SHEET).unwrap();
        assert_eq!(summary.kind, SheetKind::Summary);
        assert!(summary.preamble.is_empty());
        assert_eq!(summary.data.start_row, 0);
        assert_eq!(summary.data.columns, SUMMARY_COLUMNS.to_vec());
        assert_eq!(
            summary.data.rows,
            vec![
                vec![text("Dr. Smith"), CellValue::Float(3.0), count(2), count(0), count(2)],
                vec![text("Dr. Lee"), CellValue::Float(1.5), count(0), count(1), count(1)],
            ]
        );
    }

    #[test]
    fn test_calendar_sheet_is_static() {
        let sheet = calendar_sheet();
        assert_eq!(sheet.name, CALENDAR_SHEET);
        assert_eq!(sheet.data.columns, vec!["Date", "Occasion", "Status"]);
        assert_eq!(sheet.data.rows.len(), 4);
        assert_eq!(
            sheet.data.rows[1],
            vec![text("2026-01-26"), text("Republic Day"), text("Academic Holiday")]
        );
        assert_eq!(
            sheet.data.rows[3],
            vec![text("2026-04-10"), text("Good Friday"), text("Public Holiday")]
        );
    }

    #[test]
    fn test_no_faculty_rows_still_has_fixed_sheets() {
        let wb = build(&["Faculty", "Room"], &[&["", "101"]], &Settings::default());
        assert_eq!(wb.sheet_names(), vec![SUMMARY_SHEET, CALENDAR_SHEET]);
        assert!(wb.sheets[0].data.rows.is_empty());
        assert_eq!(wb.sheets[0].data.columns.len(), 5);
    }

    #[test]
    fn test_custom_data_offset_and_width() {
        let settings = Settings { data_start_row: 9, column_width: 25.0, ..Settings::default() };
        let wb = build(&["Faculty"], &[&["X"]], &settings);
        assert_eq!(wb.sheets[0].data.start_row, 9);
        assert_eq!(wb.sheets[0].column_width, Some(25.0));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let rows: &[&[&str]] = &[&["B", "1"], &["A", "2"], &["B", "3"], &["C", "x"]];
        let first = build(&["Teacher", "Hours"], rows, &Settings::default());
        let second = build(&["Teacher", "Hours"], rows, &Settings::default());
        assert_eq!(first, second);
        assert_eq!(first.sheet_names()[..3], ["B", "A", "C"]);
    }
}

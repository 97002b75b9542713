//! Group timetable rows by faculty and compute per-faculty metrics.
//!
//! # Architecture
//!
//! ```text
//! RawTable (flat sessions)            →  FacultyGroups (first-seen order)
//! ┌──────────────────────────────┐      ┌─────────────────────────────┐
//! │ Dr. Smith │ 1 hour  │ UG     │      │ Dr. Smith: rows [0, 1]      │
//! │ Dr. Smith │ 2 hours │ UG     │  →   │   3 hrs, UG 2, PG 0         │
//! │ Dr. Lee   │ 1.5 hrs │ PG     │      ├─────────────────────────────┤
//! │ (blank)   │ 1 hour  │ UG     │      │ Dr. Lee: rows [2]           │
//! └──────────────────────────────┘      │   1.5 hrs, UG 0, PG 1       │
//!                                       └─────────────────────────────┘
//! ```
//!
//! Rows with a missing faculty value belong to no group.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::LevelFallback;
use crate::roles::ColumnRoles;
use crate::table::{CellValue, GroupKey, RawTable};

/// First integer or decimal number in a cell's text.
static HOURS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("valid hours pattern")
});

/// Rows sharing one faculty value, in original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyGroup {
    /// The faculty cell as read (from the first row of the group).
    pub faculty: CellValue,
    /// Row indices into the table.
    pub rows: Vec<usize>,
}

impl FacultyGroup {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partition table rows by the faculty column.
///
/// Groups come out in order of first appearance; rows with a missing faculty
/// value are left out.
pub fn group_by_faculty(table: &RawTable, roles: &ColumnRoles) -> Vec<FacultyGroup> {
    let column = roles.faculty.index;
    let mut groups: IndexMap<GroupKey, FacultyGroup> = IndexMap::new();

    for row_index in 0..table.row_count() {
        let cell = table.cell(row_index, column);
        if let Some(key) = cell.group_key() {
            groups
                .entry(key)
                .or_insert_with(|| FacultyGroup {
                    faculty: cell.clone(),
                    rows: Vec::new(),
                })
                .rows
                .push(row_index);
        }
    }

    groups.into_values().collect()
}

/// Extract the first number from a duration cell's text.
///
/// `"1.5 hours"` → `Some(1.5)`, `"n/a"` → `None`.
pub fn extract_hours(text: &str) -> Option<f64> {
    HOURS_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Academic level of a faculty's teaching load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcademicLevel {
    Mixed,
    Ug,
    Pg,
    Unclassified,
}

impl AcademicLevel {
    /// Classify from session counts.
    pub fn classify(ug_sessions: usize, pg_sessions: usize, fallback: LevelFallback) -> Self {
        match (ug_sessions > 0, pg_sessions > 0) {
            (true, true) => AcademicLevel::Mixed,
            (true, false) => AcademicLevel::Ug,
            (false, true) => AcademicLevel::Pg,
            (false, false) => match fallback {
                LevelFallback::Unclassified => AcademicLevel::Unclassified,
                LevelFallback::Pg => AcademicLevel::Pg,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcademicLevel::Mixed => "Mixed",
            AcademicLevel::Ug => "UG",
            AcademicLevel::Pg => "PG",
            AcademicLevel::Unclassified => "Unclassified",
        }
    }
}

impl std::fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived metrics for one faculty group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMetrics {
    pub total_hours: f64,
    pub ug_sessions: usize,
    pub pg_sessions: usize,
    pub total_sessions: usize,
}

impl FacultyMetrics {
    pub fn compute(table: &RawTable, group: &FacultyGroup, roles: &ColumnRoles) -> Self {
        let total_sessions = group.len();

        let total_hours = match &roles.duration {
            Some(column) => group
                .rows
                .iter()
                .filter_map(|&row| extract_hours(&table.cell(row, column.index).to_text()))
                .sum::<f64>(),
            // One hour per session when durations are not recorded
            None => total_sessions as f64,
        };

        let (ug_sessions, pg_sessions) = match &roles.level {
            Some(column) => group.rows.iter().fold((0, 0), |(ug, pg), &row| {
                let level = table.cell(row, column.index).to_text().to_uppercase();
                (
                    ug + usize::from(level.contains("UG")),
                    pg + usize::from(level.contains("PG")),
                )
            }),
            None => (0, 0),
        };

        Self {
            total_hours,
            ug_sessions,
            pg_sessions,
            total_sessions,
        }
    }

    pub fn academic_level(&self, fallback: LevelFallback) -> AcademicLevel {
        AcademicLevel::classify(self.ug_sessions, self.pg_sessions, fallback)
    }
}

/// A faculty group with its metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultySummary {
    pub group: FacultyGroup,
    pub metrics: FacultyMetrics,
}

/// Group the table and compute metrics for every group.
pub fn summarize(table: &RawTable, roles: &ColumnRoles) -> Vec<FacultySummary> {
    group_by_faculty(table, roles)
        .into_iter()
        .map(|group| {
            let metrics = FacultyMetrics::compute(table, &group, roles);
            FacultySummary { group, metrics }
        })
        .collect()
}

//! # Timetable Splitter - per-faculty academic workbooks
//!
//! Reads a university timetable (spreadsheet or delimited text), infers which
//! columns hold the faculty, session duration and academic level, and writes
//! an XLSX workbook with one profile sheet per faculty member, a university
//! summary and an academic calendar.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Timetable  │────▶│    Table    │────▶│   Metrics   │────▶│  Workbook   │
//! │ (xlsx/csv)  │     │  (+ roles)  │     │ (per group) │     │   (.xlsx)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use timetable_splitter::{process_timetable, Settings};
//!
//! fn main() {
//!     let settings = Settings::from_env().unwrap();
//!     let report = process_timetable("timetable.xlsx".as_ref(), "out.xlsx".as_ref(), &settings).unwrap();
//!     println!("{} faculty sheets", report.faculty_count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment-driven settings
//! - [`logs`] - Console logging
//! - [`table`] - Input reading (workbooks and delimited text)
//! - [`roles`] - Column role inference
//! - [`metrics`] - Faculty grouping and metrics
//! - [`workbook`] - Output workbook model
//! - [`writer`] - XLSX serialization
//! - [`pipeline`] - End-to-end processing

// Core modules
pub mod config;
pub mod error;
pub mod logs;

// Input
pub mod table;

// Analysis
pub mod metrics;
pub mod roles;

// Output
pub mod workbook;
pub mod writer;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, PipelineError, TableError, WriteError};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{LevelFallback, Settings};
pub use logs::{set_log_format, LogFormat};

// =============================================================================
// Re-exports - Table reading
// =============================================================================

pub use table::{read_table, CellValue, LoadedTable, RawTable, TableSource};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use metrics::{
    extract_hours,
    group_by_faculty,
    summarize,
    AcademicLevel,
    FacultyGroup,
    FacultyMetrics,
    FacultySummary,
};
pub use roles::{resolve_roles, ColumnRef, ColumnRoles, Role};

// =============================================================================
// Re-exports - Workbook
// =============================================================================

pub use workbook::{
    assemble_workbook,
    sanitize_sheet_name,
    OutputWorkbook,
    SheetKind,
    SheetModel,
    CALENDAR_SHEET,
    SUMMARY_SHEET,
};
pub use writer::{workbook_bytes, write_workbook, WriterOptions};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{process_timetable, transform_table, ProcessReport, TransformOutcome};

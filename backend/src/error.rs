//! Error types for the timetable splitting pipeline.
//!
//! - [`TableError`] - Reading the input timetable
//! - [`WriteError`] - Serializing the output workbook
//! - [`ConfigError`] - Invalid environment configuration
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while loading the input timetable.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not a known spreadsheet or delimited format.
    #[error("Unsupported input format: '{0}'")]
    UnsupportedFormat(String),

    /// The spreadsheet reader rejected the workbook.
    #[error("Invalid workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// The delimited-text reader rejected a record.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook contains no worksheet to read.
    #[error("Workbook has no worksheets")]
    NoSheets,

    /// Input has no header row at all.
    #[error("Input file is empty")]
    EmptyFile,

    /// Header row is present but has no columns.
    #[error("Table has no columns")]
    NoColumns,
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while serializing the output workbook.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The xlsx writer failed.
    #[error("Workbook write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Sheet does not fit in a worksheet.
    #[error("Sheet '{sheet}' is too large: {rows} rows x {columns} columns")]
    SheetTooLarge {
        sheet: String,
        rows: usize,
        columns: usize,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid value in an environment variable.
#[derive(Debug, Error)]
#[error("Invalid value '{value}' for {variable}: {reason}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub reason: String,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::pipeline::process_timetable`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be read as a table.
    #[error("Input error: {0}")]
    Table(#[from] TableError),

    /// Output workbook could not be written.
    #[error("Output error: {0}")]
    Write(#[from] WriteError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for output operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

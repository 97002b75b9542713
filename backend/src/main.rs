//! Timetable splitter CLI - one workbook sheet per faculty member
//!
//! ```bash
//! timetable-split timetable.xlsx faculty_timetables.xlsx
//! timetable-split timetable.csv faculty_timetables.xlsx
//! ```
//!
//! Settings come from `TIMETABLE_*` environment variables (or `.env`).

use clap::Parser;
use std::path::{Path, PathBuf};
use timetable_splitter::logs::log_error;
use timetable_splitter::{process_timetable, set_log_format, PipelineError, Settings};

#[derive(Parser)]
#[command(name = "timetable-split")]
#[command(about = "Split a university timetable into per-faculty workbook sheets", long_about = None)]
struct Cli {
    /// Input timetable (xlsx, xls, ods or csv)
    input: PathBuf,

    /// Output workbook (.xlsx)
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli.input, &cli.output) {
        log_error(format!("Academic processing error: {}", e));
        std::process::exit(1);
    }
}

fn run(input: &Path, output: &Path) -> Result<(), PipelineError> {
    let settings = Settings::from_env()?;
    set_log_format(settings.log_format);

    let report = process_timetable(input, output, &settings)?;
    eprintln!(
        "\n✨ Done! {} faculty sheets from {} rows",
        report.faculty_count, report.row_count
    );
    Ok(())
}

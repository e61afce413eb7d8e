use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can stop a scan or a filter run.
///
/// Validation variants are raised before any file is touched; I/O variants abort the run
/// before an output file is presumed valid.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Please select an Excel file")]
    NoInputFile,

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unable to read workbook {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Please select a team leader")]
    NoTeamLeader,

    #[error(
        "Start date {} cannot be after end date {}",
        .start.format("%d.%m.%Y"),
        .end.format("%d.%m.%Y")
    )]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date '{0}', expected dd.mm.yyyy")]
    InvalidDate(String),

    #[error("Output path is the input file: {}", .0.display())]
    OutputSameAsInput(PathBuf),

    #[error("Unable to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: OutputError,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

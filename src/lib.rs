pub mod app;
pub mod error;
pub mod excel;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod ui;
pub mod utils;

pub use error::{ProcessError, ProcessResult};
pub use pipeline::{RunConfig, RunOutcome, WorkbookSummary, run, scan_workbook};

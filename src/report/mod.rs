mod table;
mod writer;

pub use table::{Preview, ReportTable, SOURCE_SHEET_COLUMN};
pub use writer::{REPORT_SHEET_NAME, output_path_for, write_report};

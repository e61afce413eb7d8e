mod cell;
mod sheet;
mod workbook;

pub use cell::CellValue;
pub use sheet::{Row, Sheet, create_sheet_from_range};
pub use workbook::{Workbook, open_workbook};

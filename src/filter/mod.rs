mod criteria;
mod rows;
mod sheet_date;

pub use criteria::{FilterCriteria, same_leader};
pub use rows::{discover_team_leaders, filter_rows, find_team_leader_column, select_sheets};
pub use sheet_date::{
    DatedSheet, SheetName, SkipReason, SkippedSheet, catalog_sheets, format_sheet_date,
    parse_date_input, parse_sheet_name,
};

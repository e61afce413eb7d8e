use serde::Serialize;

use crate::excel::{CellValue, Row};

pub const SOURCE_SHEET_COLUMN: &str = "Source Sheet";

/// The rows collected for a report. Columns are the union of the headers of every sheet that was
/// processed, in first-seen order, so sheets with slightly different layouts still line up.
#[derive(Clone, Debug, Default)]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<(String, Row)>,
    include_source_sheet: bool,
}

/// A few rows rendered as text, for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Preview {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(include_source_sheet: bool) -> Self {
        Self {
            include_source_sheet,
            ..Self::default()
        }
    }

    pub fn add_columns(&mut self, header: &[String]) {
        for column in header {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
    }

    pub fn push_rows(&mut self, sheet_name: &str, rows: Vec<Row>) {
        self.rows
            .extend(rows.into_iter().map(|row| (sheet_name.to_string(), row)));
    }

    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Output header, with the source sheet column last when enabled.
    pub fn header(&self) -> Vec<String> {
        let mut header = self.columns.clone();
        if self.include_source_sheet {
            header.push(self.source_column_name());
        }
        header
    }

    /// Cells of each row in header order. Columns a row's sheet did not have come back empty.
    pub fn rows(&self) -> impl Iterator<Item = Vec<CellValue>> + '_ {
        self.rows.iter().map(|(sheet, row)| {
            let mut cells: Vec<CellValue> = self
                .columns
                .iter()
                .map(|column| row.get(column).cloned().unwrap_or(CellValue::Empty))
                .collect();
            if self.include_source_sheet {
                cells.push(CellValue::String(sheet.clone()));
            }
            cells
        })
    }

    pub fn preview(&self, limit: usize) -> Preview {
        Preview {
            header: self.header(),
            rows: self
                .rows()
                .take(limit)
                .map(|cells| cells.iter().map(CellValue::display_text).collect())
                .collect(),
        }
    }

    fn source_column_name(&self) -> String {
        let mut name = SOURCE_SHEET_COLUMN.to_string();
        let mut suffix = 1;
        while self.columns.contains(&name) {
            name = format!("{}.{}", SOURCE_SHEET_COLUMN, suffix);
            suffix += 1;
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::String(v.to_string())))
            .collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn header_is_union_in_first_seen_order() {
        let mut table = ReportTable::new(false);
        table.add_columns(&strings(&["Name", "Team Leader", "AHT"]));
        table.add_columns(&strings(&["Name", "Team Leader", "Lunch", "AHT"]));
        assert_eq!(table.header(), strings(&["Name", "Team Leader", "AHT", "Lunch"]));
    }

    #[test]
    fn missing_columns_are_blank() {
        let mut table = ReportTable::new(false);
        table.add_columns(&strings(&["Name", "Lunch"]));
        table.push_rows("01.01.2024", vec![row(&[("Name", "Agent 1")])]);

        let rows: Vec<Vec<CellValue>> = table.rows().collect();
        assert_eq!(
            rows,
            vec![vec![CellValue::String("Agent 1".into()), CellValue::Empty]]
        );
    }

    #[test]
    fn source_sheet_column_is_appended() {
        let mut table = ReportTable::new(true);
        table.add_columns(&strings(&["Name", "Source Sheet"]));
        table.push_rows("02.01.2024", vec![row(&[("Name", "Agent 1")])]);

        assert_eq!(
            table.header(),
            strings(&["Name", "Source Sheet", "Source Sheet.1"])
        );
        let preview = table.preview(10);
        assert_eq!(preview.rows, vec![strings(&["Agent 1", "", "02.01.2024"])]);
    }
}

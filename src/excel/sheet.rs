use calamine::{Data, Range};
use indexmap::IndexMap;

use crate::excel::CellValue;
use crate::utils::index_to_col_name;

/// One data row, keyed by header name in column order.
pub type Row = IndexMap<String, CellValue>;

#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

/// Builds a sheet from a calamine range. The first row of the used area is the header; rows
/// with no non-empty cell are dropped.
pub fn create_sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows_iter = range.rows();

    let Some(header_row) = rows_iter.next() else {
        return Sheet {
            name: name.to_string(),
            ..Sheet::default()
        };
    };

    let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let header = build_header(header_row, first_col);

    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    for data_row in rows_iter {
        let mut row = Row::with_capacity(header.len());
        for (col_idx, column) in header.iter().enumerate() {
            let value = data_row
                .get(col_idx)
                .map(CellValue::from)
                .unwrap_or(CellValue::Empty);
            row.insert(column.clone(), value);
        }

        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Sheet {
        name: name.to_string(),
        header,
        rows,
    }
}

// Header names must be unique keys: blanks become "Column <letter>", repeats get ".1", ".2", ...
fn build_header(cells: &[Data], first_col: usize) -> Vec<String> {
    let mut header: Vec<String> = Vec::with_capacity(cells.len());

    for (offset, cell) in cells.iter().enumerate() {
        let text = CellValue::from(cell).display_text().trim().to_string();
        let base = if text.is_empty() {
            format!("Column {}", index_to_col_name(first_col + offset + 1))
        } else {
            text
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while header.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        header.push(candidate);
    }

    header
}

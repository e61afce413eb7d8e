use rust_xlsxwriter::{Format, FormatAlign, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::OutputError;
use crate::excel::CellValue;
use crate::report::ReportTable;
use crate::utils::display_width;

pub const REPORT_SHEET_NAME: &str = "Summary";

const HEADER_BACKGROUND: u32 = 0x003366;
const HEADER_FONT: u32 = 0xFFFFFF;
const MAX_COLUMN_WIDTH: f64 = 60.0;

struct ReportFormats {
    header: Format,
    date: Format,
    date_time: Format,
    time: Format,
    duration: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_font_color(HEADER_FONT)
                .set_background_color(HEADER_BACKGROUND),
            date: Format::new().set_num_format("dd.mm.yyyy"),
            date_time: Format::new().set_num_format("dd.mm.yyyy hh:mm:ss"),
            time: Format::new().set_num_format("hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// `<stem>_filtered<ext>` next to the input. The report is always OOXML, so only `.xlsx` and
/// `.xlsm` are kept; anything else is written as `.xlsx`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workbook");

    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"))
        .unwrap_or("xlsx");

    let file_name = format!("{}_filtered.{}", stem, extension);
    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn part_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| REPORT_SHEET_NAME.to_string());
    path.with_file_name(format!(".{}.part", name))
}

/// Writes `table` to `path`, replacing any existing file. The bytes go to a sibling part file
/// that is renamed over `path`, so a failed write leaves an earlier output untouched.
pub fn write_report(table: &ReportTable, path: &Path) -> Result<(), OutputError> {
    let mut workbook = build_workbook(table)?;
    let buffer = workbook.save_to_buffer()?;

    let part = part_path_for(path);
    if let Err(e) = fs::write(&part, &buffer).and_then(|_| fs::rename(&part, path)) {
        if part.is_file() && fs::remove_file(&part).is_err() {
            warn!(path = %part.display(), "could not remove partial output file");
        }
        return Err(e.into());
    }

    info!(
        path = %path.display(),
        rows = table.row_count(),
        bytes = buffer.len(),
        "report written"
    );
    Ok(())
}

fn build_workbook(table: &ReportTable) -> Result<XlsxWorkbook, XlsxError> {
    let mut workbook = XlsxWorkbook::new();
    let formats = ReportFormats::new();
    let header = table.header();

    let worksheet = workbook.add_worksheet().set_name(REPORT_SHEET_NAME)?;

    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &formats.header)?;
    }

    for (row_idx, cells) in table.rows().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, &formats)?;

            let width = display_width(&cell.display_text());
            if width > widths[col] {
                widths[col] = width;
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let adjusted = ((*width + 2) as f64 * 1.2).min(MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, adjusted)?;
    }

    if !header.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(workbook)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &ReportFormats,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(serial) => {
            let format = if *serial < 1.0 {
                &formats.time
            } else if serial.fract() == 0.0 {
                &formats.date
            } else {
                &formats.date_time
            };
            worksheet.write_number_with_format(row, col, *serial, format)?;
        }
        CellValue::Duration(days) => {
            worksheet.write_number_with_format(row, col, *days, &formats.duration)?;
        }
        CellValue::DateTimeIso(_) | CellValue::DurationIso(_) | CellValue::Error(_) => {
            worksheet.write_string(row, col, cell.display_text())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_filtered_name_next_to_input() {
        assert_eq!(
            output_path_for(Path::new("/data/report.xlsx")),
            PathBuf::from("/data/report_filtered.xlsx")
        );
        assert_eq!(
            output_path_for(Path::new("daily.XLSX")),
            PathBuf::from("daily_filtered.XLSX")
        );
        assert_eq!(
            output_path_for(Path::new("macro.xlsm")),
            PathBuf::from("macro_filtered.xlsm")
        );
    }

    #[test]
    fn non_ooxml_inputs_get_xlsx_output() {
        assert_eq!(
            output_path_for(Path::new("/data/old.xls")),
            PathBuf::from("/data/old_filtered.xlsx")
        );
        assert_eq!(
            output_path_for(Path::new("sheets.ods")),
            PathBuf::from("sheets_filtered.xlsx")
        );
        assert_eq!(
            output_path_for(Path::new("noext")),
            PathBuf::from("noext_filtered.xlsx")
        );
    }

    #[test]
    fn header_only_report_is_a_valid_workbook() {
        let mut table = ReportTable::new(false);
        table.add_columns(&["Name".to_string(), "Team Leader".to_string()]);

        let mut workbook = build_workbook(&table).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn failed_write_reports_io_error() {
        let table = ReportTable::new(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let err = write_report(&table, &path).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_keeps_previous_output() {
        let table = ReportTable::new(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        fs::write(&path, b"previous report").unwrap();

        // A directory in the way of the part file makes the write fail
        fs::create_dir(part_path_for(&path)).unwrap();

        let err = write_report(&table, &path).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
        assert_eq!(fs::read(&path).unwrap(), b"previous report");
    }

    #[test]
    fn successful_write_replaces_output_and_leaves_no_part_file() {
        let mut table = ReportTable::new(false);
        table.add_columns(&["Name".to_string()]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        fs::write(&path, b"previous report").unwrap();

        write_report(&table, &path).unwrap();
        assert_eq!(&fs::read(&path).unwrap()[0..2], b"PK");
        assert!(!part_path_for(&path).exists());
    }
}

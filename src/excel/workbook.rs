use calamine::{Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcessError, ProcessResult};
use crate::excel::{Sheet, create_sheet_from_range};

/// A read-only input workbook. Sheets are loaded one at a time on demand so a run only pays for
/// the sheets it actually filters.
pub struct Workbook {
    reader: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
    file_path: PathBuf,
}

pub fn open_workbook<P: AsRef<Path>>(path: P) -> ProcessResult<Workbook> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ProcessError::InputNotFound(path.to_path_buf()));
    }

    let reader = open_workbook_auto(path).map_err(|source| ProcessError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_names = reader.sheet_names().to_vec();
    debug!(path = %path.display(), sheets = sheet_names.len(), "opened workbook");

    Ok(Workbook {
        reader,
        sheet_names,
        file_path: path.to_path_buf(),
    })
}

impl Workbook {
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn read_sheet(&mut self, name: &str) -> ProcessResult<Sheet> {
        let range = self
            .reader
            .worksheet_range(name)
            .map_err(|source| ProcessError::Unreadable {
                path: self.file_path.clone(),
                source,
            })?;

        let sheet = create_sheet_from_range(name, &range);
        debug!(sheet = name, rows = sheet.rows.len(), "loaded sheet");
        Ok(sheet)
    }
}

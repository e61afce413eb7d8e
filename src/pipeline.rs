use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ProcessError, ProcessResult};
use crate::excel::{Sheet, open_workbook};
use crate::filter::{
    DatedSheet, FilterCriteria, SkipReason, SkippedSheet, catalog_sheets, discover_team_leaders,
    filter_rows, find_team_leader_column, select_sheets,
};
use crate::report::{Preview, ReportTable, output_path_for, write_report};

const PREVIEW_ROWS: usize = 10;

/// Everything one filter run needs. Built by the CLI or by the form; nothing else is consulted.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub criteria: FilterCriteria,
    pub include_source_sheet: bool,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, criteria: FilterCriteria) -> Self {
        Self {
            input: input.into(),
            output: None,
            criteria,
            include_source_sheet: false,
        }
    }

    /// The explicit output path, or `<stem>_filtered<ext>` next to the input.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| output_path_for(&self.input))
    }
}

/// What a workbook offers before any filtering: its date sheets, the team leaders found in them
/// and the date bounds.
#[derive(Clone, Debug, Default, Serialize)]
pub struct WorkbookSummary {
    pub path: PathBuf,
    pub date_sheets: Vec<DatedSheet>,
    pub skipped: Vec<SkippedSheet>,
    pub team_leaders: Vec<String>,
}

impl WorkbookSummary {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.date_sheets.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.date_sheets.last().map(|s| s.date)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RunOutcome {
    pub output: PathBuf,
    pub criteria: FilterCriteria,
    pub header: Vec<String>,
    pub rows_written: usize,
    pub sheets_used: Vec<String>,
    pub skipped: Vec<SkippedSheet>,
    pub preview: Preview,
}

/// Reads every date sheet once to collect team leader names.
pub fn scan_workbook(path: &Path) -> ProcessResult<WorkbookSummary> {
    let mut workbook = open_workbook(path)?;
    let (date_sheets, mut skipped) = catalog_sheets(workbook.sheet_names());

    if date_sheets.is_empty() {
        warn!(path = %path.display(), "no sheets named dd.mm.yyyy");
    }

    let mut sheets: Vec<Sheet> = Vec::with_capacity(date_sheets.len());
    for dated in &date_sheets {
        let sheet = workbook.read_sheet(&dated.name)?;
        if let Some(reason) = unusable(&sheet) {
            skipped.push(SkippedSheet {
                name: dated.name.clone(),
                reason,
            });
        }
        sheets.push(sheet);
    }

    let team_leaders = discover_team_leaders(&sheets);
    info!(
        path = %path.display(),
        date_sheets = date_sheets.len(),
        skipped = skipped.len(),
        team_leaders = team_leaders.len(),
        "workbook scanned"
    );

    Ok(WorkbookSummary {
        path: path.to_path_buf(),
        date_sheets,
        skipped,
        team_leaders,
    })
}

/// Read, filter and write. The output is only touched after every input sheet was read.
pub fn run(config: &RunConfig) -> ProcessResult<RunOutcome> {
    let output = config.output_path();
    if same_file(&config.input, &output) {
        return Err(ProcessError::OutputSameAsInput(output));
    }

    let mut workbook = open_workbook(&config.input)?;
    let (date_sheets, mut skipped) = catalog_sheets(workbook.sheet_names());
    let selected = select_sheets(&date_sheets, &config.criteria);

    info!(
        team_leader = config.criteria.team_leader(),
        sheets = selected.len(),
        "filtering"
    );

    let mut table = ReportTable::new(config.include_source_sheet);
    let mut sheets_used = Vec::with_capacity(selected.len());

    for dated in &selected {
        let sheet = workbook.read_sheet(&dated.name)?;
        if sheet.is_empty() {
            skipped.push(SkippedSheet {
                name: dated.name.clone(),
                reason: SkipReason::Empty,
            });
            continue;
        }

        match filter_rows(&sheet, &config.criteria) {
            Some(rows) => {
                table.add_columns(&sheet.header);
                debug!(sheet = %dated.name, matched = rows.len(), "sheet filtered");
                table.push_rows(&dated.name, rows);
                sheets_used.push(dated.name.clone());
            }
            None => {
                warn!(sheet = %dated.name, "sheet has no team leader column");
                skipped.push(SkippedSheet {
                    name: dated.name.clone(),
                    reason: SkipReason::NoTeamLeaderColumn,
                });
            }
        }
    }

    // No usable sheet in range: take the header of the first date sheet with a team leader column.
    if !table.has_columns() {
        for dated in &date_sheets {
            let sheet = workbook.read_sheet(&dated.name)?;
            if unusable(&sheet).is_none() {
                table.add_columns(&sheet.header);
                break;
            }
        }
    }

    write_report(&table, &output).map_err(|source| ProcessError::OutputWrite {
        path: output.clone(),
        source,
    })?;

    Ok(RunOutcome {
        output,
        criteria: config.criteria.clone(),
        header: table.header(),
        rows_written: table.row_count(),
        sheets_used,
        skipped,
        preview: table.preview(PREVIEW_ROWS),
    })
}

fn unusable(sheet: &Sheet) -> Option<SkipReason> {
    if sheet.is_empty() {
        Some(SkipReason::Empty)
    } else if find_team_leader_column(&sheet.header).is_none() {
        Some(SkipReason::NoTeamLeaderColumn)
    } else {
        None
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

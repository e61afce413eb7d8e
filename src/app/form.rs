use chrono::{Duration, NaiveDate};
use std::path::PathBuf;
use tracing::info;

use crate::app::{Field, FormState, Status};
use crate::error::{ProcessError, ProcessResult};
use crate::filter::{FilterCriteria, format_sheet_date, parse_date_input};
use crate::pipeline::{RunConfig, run, scan_workbook};
use crate::report::output_path_for;

impl FormState<'_> {
    pub fn input_path(&self) -> Option<PathBuf> {
        let text = Self::text_of(&self.path_input);
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(PathBuf::from(text))
        }
    }

    pub fn set_input_path(&mut self, path: &str) {
        Self::replace_text(&mut self.path_input, path.to_string());
    }

    pub fn selected_team_leader(&self) -> Option<&str> {
        let summary = self.summary.as_ref()?;
        let idx = self.team_leader_index?;
        summary.team_leaders.get(idx).map(String::as_str)
    }

    pub fn team_leaders(&self) -> &[String] {
        self.summary
            .as_ref()
            .map(|s| s.team_leaders.as_slice())
            .unwrap_or(&[])
    }

    /// Output path a submit would write to right now.
    pub fn output_path(&self) -> Option<PathBuf> {
        match &self.output_override {
            Some(path) => Some(path.clone()),
            None => self.input_path().map(|p| output_path_for(&p)),
        }
    }

    /// Scans the workbook named in the file field and fills the team leader selector and the
    /// date range from it.
    pub fn load_workbook(&mut self) {
        let Some(path) = self.input_path() else {
            self.status = Status::Error(ProcessError::NoInputFile.to_string());
            return;
        };

        self.last_outcome = None;

        let summary = match scan_workbook(&path) {
            Ok(summary) => summary,
            Err(e) => {
                self.summary = None;
                self.team_leader_index = None;
                self.status = Status::Error(format!("Error processing workbook: {}", e));
                return;
            }
        };

        for skipped in &summary.skipped {
            self.add_notification(format!(
                "Skipped sheet '{}': {}",
                skipped.name,
                skipped.reason.describe()
            ));
        }

        self.team_leader_index = if summary.team_leaders.is_empty() {
            None
        } else {
            Some(0)
        };

        if let (Some(first), Some(last)) = (summary.first_date(), summary.last_date()) {
            Self::replace_text(&mut self.start_input, format_sheet_date(first));
            Self::replace_text(&mut self.end_input, format_sheet_date(last));
        }

        self.status = if summary.date_sheets.is_empty() {
            Status::Warning("No sheets found with date format dd.mm.yyyy".to_string())
        } else if summary.team_leaders.is_empty() {
            Status::Warning("No team leaders found in any sheets".to_string())
        } else {
            Status::Info(format!(
                "Loaded {} date sheets with {} team leaders",
                summary.date_sheets.len(),
                summary.team_leaders.len()
            ))
        };

        self.summary = Some(summary);
        self.focus = Field::TeamLeader;
    }

    pub fn cycle_team_leader(&mut self, delta: isize) {
        let count = self.team_leaders().len();
        if count == 0 {
            return;
        }

        let current = self.team_leader_index.unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(count as isize) as usize;
        self.team_leader_index = Some(next);
    }

    pub fn toggle_source_sheet(&mut self) {
        self.include_source_sheet = !self.include_source_sheet;
    }

    pub fn date_value(&self, field: Field) -> ProcessResult<NaiveDate> {
        match field {
            Field::StartDate => parse_date_input(&Self::text_of(&self.start_input)),
            Field::EndDate => parse_date_input(&Self::text_of(&self.end_input)),
            _ => Err(ProcessError::InvalidDate(String::new())),
        }
    }

    /// Moves a date field by `days`. An unparsable field is left alone.
    pub fn step_date(&mut self, field: Field, days: i64) {
        let date = match self.date_value(field) {
            Ok(date) => date,
            Err(e) => {
                self.add_notification(e.to_string());
                return;
            }
        };

        let Some(stepped) = date.checked_add_signed(Duration::days(days)) else {
            return;
        };

        let text = format_sheet_date(stepped);
        match field {
            Field::StartDate => Self::replace_text(&mut self.start_input, text),
            Field::EndDate => Self::replace_text(&mut self.end_input, text),
            _ => {}
        }
    }

    /// Validates the form and turns it into a run configuration. Nothing is read or written.
    pub fn build_run_config(&self) -> ProcessResult<RunConfig> {
        let input = self.input_path().ok_or(ProcessError::NoInputFile)?;
        if !input.is_file() {
            return Err(ProcessError::InputNotFound(input));
        }

        let team_leader = self
            .selected_team_leader()
            .ok_or(ProcessError::NoTeamLeader)?;
        let start = self.date_value(Field::StartDate)?;
        let end = self.date_value(Field::EndDate)?;
        let criteria = FilterCriteria::new(team_leader, start, end)?;

        Ok(RunConfig {
            input,
            output: self.output_override.clone(),
            criteria,
            include_source_sheet: self.include_source_sheet,
        })
    }

    /// The "Process Data" action. Runs synchronously; the interface waits for it.
    pub fn submit(&mut self) {
        // The selector only describes the workbook it was loaded from.
        let loaded = self.summary.as_ref().map(|s| s.path.clone());
        if self.input_path().is_some() && loaded != self.input_path() {
            self.load_workbook();
            if matches!(self.status, Status::Error(_)) {
                return;
            }
        }

        let config = match self.build_run_config() {
            Ok(config) => config,
            Err(e) => {
                self.status = Status::Error(e.to_string());
                return;
            }
        };

        match run(&config) {
            Ok(outcome) => {
                info!(output = %outcome.output.display(), rows = outcome.rows_written, "run finished");
                self.status = if outcome.rows_written == 0 {
                    Status::Warning(format!(
                        "No data found for team leader: {}. Header written to: {}",
                        config.criteria.team_leader(),
                        outcome.output.display()
                    ))
                } else {
                    Status::Success(format!(
                        "Processing complete! {} rows saved to: {}",
                        outcome.rows_written,
                        outcome.output.display()
                    ))
                };
                self.add_notification(format!(
                    "{} rows from {} sheets -> {}",
                    outcome.rows_written,
                    outcome.sheets_used.len(),
                    outcome.output.display()
                ));
                self.last_outcome = Some(outcome);
            }
            Err(e) => {
                self.status = Status::Error(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormOptions;
    use crate::pipeline::WorkbookSummary;

    fn form_with_summary(leaders: &[&str]) -> FormState<'static> {
        let mut form = FormState::new(None, FormOptions::default());
        form.summary = Some(WorkbookSummary {
            team_leaders: leaders.iter().map(|l| l.to_string()).collect(),
            ..WorkbookSummary::default()
        });
        form.team_leader_index = if leaders.is_empty() { None } else { Some(0) };
        form
    }

    #[test]
    fn missing_file_is_reported_first() {
        let form = form_with_summary(&["John"]);
        assert!(matches!(
            form.build_run_config(),
            Err(ProcessError::NoInputFile)
        ));

        let mut form = form;
        form.set_input_path("/definitely/not/here.xlsx");
        assert!(matches!(
            form.build_run_config(),
            Err(ProcessError::InputNotFound(_))
        ));
    }

    #[test]
    fn validation_order_and_messages() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut form = form_with_summary(&[]);
        form.set_input_path(&file.path().to_string_lossy());

        assert!(matches!(
            form.build_run_config(),
            Err(ProcessError::NoTeamLeader)
        ));

        let mut form = form_with_summary(&["John"]);
        form.set_input_path(&file.path().to_string_lossy());
        FormState::replace_text(&mut form.start_input, "05.01.2024".into());
        FormState::replace_text(&mut form.end_input, "1.1.2024".into());
        assert!(matches!(
            form.build_run_config(),
            Err(ProcessError::InvalidDate(_))
        ));

        FormState::replace_text(&mut form.end_input, "01.01.2024".into());
        assert!(matches!(
            form.build_run_config(),
            Err(ProcessError::InvalidDateRange { .. })
        ));

        FormState::replace_text(&mut form.end_input, "05.01.2024".into());
        let config = form.build_run_config().unwrap();
        assert_eq!(config.criteria.team_leader(), "John");
        assert_eq!(config.criteria.start(), config.criteria.end());
    }

    #[test]
    fn team_leader_selection_wraps() {
        let mut form = form_with_summary(&["John", "Mike", "Sarah"]);
        assert_eq!(form.selected_team_leader(), Some("John"));
        form.cycle_team_leader(-1);
        assert_eq!(form.selected_team_leader(), Some("Sarah"));
        form.cycle_team_leader(2);
        assert_eq!(form.selected_team_leader(), Some("Mike"));
    }

    #[test]
    fn date_stepping() {
        let mut form = form_with_summary(&["John"]);
        FormState::replace_text(&mut form.start_input, "31.01.2024".into());
        form.step_date(Field::StartDate, 1);
        assert_eq!(FormState::text_of(&form.start_input), "01.02.2024");

        FormState::replace_text(&mut form.end_input, "garbage".into());
        form.step_date(Field::EndDate, -1);
        assert_eq!(FormState::text_of(&form.end_input), "garbage");
        assert_eq!(form.notification_messages.len(), 1);
    }

    #[test]
    fn output_defaults_next_to_input() {
        let mut form = form_with_summary(&["John"]);
        assert_eq!(form.output_path(), None);

        form.set_input_path("/data/daily.xlsx");
        assert_eq!(
            form.output_path(),
            Some(PathBuf::from("/data/daily_filtered.xlsx"))
        );

        form.output_override = Some(PathBuf::from("/tmp/out.xlsx"));
        assert_eq!(form.output_path(), Some(PathBuf::from("/tmp/out.xlsx")));
    }

    #[test]
    fn load_without_path_sets_error_status() {
        let mut form = FormState::new(None, FormOptions::default());
        form.load_workbook();
        assert_eq!(form.status, Status::Error("Please select an Excel file".into()));
    }
}

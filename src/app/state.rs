use std::path::PathBuf;
use tui_textarea::{CursorMove, TextArea};

use crate::pipeline::{RunOutcome, WorkbookSummary};

/// The form's fields, in focus order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    InputFile,
    TeamLeader,
    StartDate,
    EndDate,
    SourceSheet,
    Submit,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::InputFile,
        Field::TeamLeader,
        Field::StartDate,
        Field::EndDate,
        Field::SourceSheet,
        Field::Submit,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::InputFile => "Excel File",
            Field::TeamLeader => "Team Leader",
            Field::StartDate => "Start Date",
            Field::EndDate => "End Date",
            Field::SourceSheet => "Source Sheet Column",
            Field::Submit => "",
        }
    }

    /// Fields backed by a text area, where typed characters go into the field.
    pub fn is_text(self) -> bool {
        matches!(self, Field::InputFile | Field::StartDate | Field::EndDate)
    }
}

pub enum InputMode {
    Normal,
    Command,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Info(m) | Status::Success(m) | Status::Warning(m) | Status::Error(m) => m,
        }
    }
}

/// Options carried over from the command line into the form.
#[derive(Clone, Debug, Default)]
pub struct FormOptions {
    pub output: Option<PathBuf>,
    pub include_source_sheet: bool,
}

pub struct FormState<'a> {
    pub path_input: TextArea<'a>,
    pub start_input: TextArea<'a>,
    pub end_input: TextArea<'a>,
    pub focus: Field,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub summary: Option<WorkbookSummary>,
    pub team_leader_index: Option<usize>,
    pub include_source_sheet: bool,
    pub output_override: Option<PathBuf>,
    pub last_outcome: Option<RunOutcome>,
    pub status: Status,
    pub notification_messages: Vec<String>,
    pub max_notifications: usize,
    pub help_text: String,
    pub help_scroll: usize,
    pub help_visible_lines: usize,
    pub should_quit: bool,
}

impl FormState<'_> {
    pub fn new(file_path: Option<PathBuf>, options: FormOptions) -> Self {
        let path_text = file_path
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path_input: single_line(path_text),
            start_input: single_line(String::new()),
            end_input: single_line(String::new()),
            focus: Field::InputFile,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            summary: None,
            team_leader_index: None,
            include_source_sheet: options.include_source_sheet,
            output_override: options.output,
            last_outcome: None,
            status: Status::Info("Select an Excel file to begin".to_string()),
            notification_messages: Vec::new(),
            max_notifications: 50,
            help_text: String::new(),
            help_scroll: 0,
            help_visible_lines: 20,
            should_quit: false,
        }
    }

    pub fn add_notification(&mut self, message: String) {
        self.notification_messages.push(message);

        if self.notification_messages.len() > self.max_notifications {
            self.notification_messages.remove(0);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn start_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer = String::new();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer = String::new();
    }

    pub fn add_char_to_input(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn delete_char_from_input(&mut self) {
        self.input_buffer.pop();
    }

    pub(crate) fn text_of(area: &TextArea<'_>) -> String {
        area.lines().join("")
    }

    pub(crate) fn replace_text(area: &mut TextArea<'_>, text: String) {
        *area = single_line(text);
    }
}

fn single_line<'a>(text: String) -> TextArea<'a> {
    let mut area = TextArea::new(vec![text]);
    area.move_cursor(CursorMove::End);
    area
}

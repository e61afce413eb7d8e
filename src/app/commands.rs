use std::path::PathBuf;

use crate::app::{FormState, InputMode};

impl FormState<'_> {
    pub fn execute_command(&mut self) {
        let command = self.input_buffer.trim().to_string();
        self.input_mode = InputMode::Normal;
        self.input_buffer = String::new();

        if command.is_empty() {
            return;
        }

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command.as_str(), ""),
        };

        match name {
            "q" | "quit" => self.should_quit = true,
            "help" => self.show_help(),
            "run" | "process" => self.submit(),
            "o" | "output" => self.set_output_override(arg),
            "e" | "open" => {
                if arg.is_empty() {
                    self.add_notification("Usage: :e <path>".to_string());
                } else {
                    self.set_input_path(arg);
                    self.load_workbook();
                }
            }
            "source" => {
                self.toggle_source_sheet();
                self.add_notification(format!(
                    "Source sheet column {}",
                    if self.include_source_sheet {
                        "enabled"
                    } else {
                        "disabled"
                    }
                ));
            }
            _ => self.add_notification(format!("Unknown command: {}", command)),
        }
    }

    fn set_output_override(&mut self, arg: &str) {
        if arg.is_empty() {
            self.output_override = None;
        } else {
            self.output_override = Some(PathBuf::from(arg));
        }

        match self.output_path() {
            Some(path) => self.add_notification(format!("Output: {}", path.display())),
            None => self.add_notification("Output: derived from the input file".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormOptions;

    fn run_command(form: &mut FormState<'_>, command: &str) {
        form.start_command_mode();
        for c in command.chars() {
            form.add_char_to_input(c);
        }
        form.execute_command();
    }

    #[test]
    fn output_command_sets_and_resets_override() {
        let mut form = FormState::new(Some(PathBuf::from("in.xlsx")), FormOptions::default());

        run_command(&mut form, "o /tmp/custom.xlsx");
        assert_eq!(form.output_override, Some(PathBuf::from("/tmp/custom.xlsx")));

        run_command(&mut form, "o");
        assert_eq!(form.output_override, None);
        assert_eq!(form.output_path(), Some(PathBuf::from("in_filtered.xlsx")));
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut form = FormState::new(None, FormOptions::default());

        run_command(&mut form, "frobnicate");
        assert!(!form.should_quit);
        assert_eq!(
            form.notification_messages.last().map(String::as_str),
            Some("Unknown command: frobnicate")
        );

        run_command(&mut form, "q");
        assert!(form.should_quit);
        assert!(matches!(form.input_mode, InputMode::Normal));
    }

    #[test]
    fn source_command_toggles_column() {
        let mut form = FormState::new(None, FormOptions::default());
        run_command(&mut form, "source");
        assert!(form.include_source_sheet);
    }
}

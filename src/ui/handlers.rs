use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{Input, Key, TextArea};

use crate::app::{Field, FormState, InputMode};

pub fn handle_key_event(state: &mut FormState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                state.should_quit = true;
                return;
            }
            KeyCode::Char('p') => {
                state.cancel_input();
                state.submit();
                return;
            }
            _ => {}
        }
    }

    match state.input_mode {
        InputMode::Normal => handle_form_mode(state, key.code),
        InputMode::Command => handle_command_mode(state, key.code),
        InputMode::Help => handle_help_mode(state, key.code),
    }
}

fn handle_command_mode(state: &mut FormState, key_code: KeyCode) {
    match key_code {
        KeyCode::Enter => state.execute_command(),
        KeyCode::Esc => state.cancel_input(),
        KeyCode::Backspace => state.delete_char_from_input(),
        KeyCode::Char(c) => state.add_char_to_input(c),
        _ => {}
    }
}

fn handle_form_mode(state: &mut FormState, key_code: KeyCode) {
    match key_code {
        KeyCode::Tab | KeyCode::Down => {
            state.focus_next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.focus_prev();
            return;
        }
        KeyCode::F(1) => {
            state.show_help();
            return;
        }
        KeyCode::Char(':') if !state.focus.is_text() => {
            state.start_command_mode();
            return;
        }
        _ => {}
    }

    match state.focus {
        Field::InputFile => match key_code {
            KeyCode::Enter => state.load_workbook(),
            _ => forward_to_text_area(&mut state.path_input, key_code),
        },
        Field::TeamLeader => match key_code {
            KeyCode::Left | KeyCode::Char('h') => state.cycle_team_leader(-1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                state.cycle_team_leader(1)
            }
            KeyCode::Enter => state.focus_next(),
            _ => {}
        },
        Field::StartDate | Field::EndDate => handle_date_field(state, key_code),
        Field::SourceSheet => match key_code {
            KeyCode::Char(' ') | KeyCode::Enter => state.toggle_source_sheet(),
            _ => {}
        },
        Field::Submit => match key_code {
            KeyCode::Enter | KeyCode::Char(' ') => state.submit(),
            _ => {}
        },
    }
}

fn handle_date_field(state: &mut FormState, key_code: KeyCode) {
    let field = state.focus;

    match key_code {
        KeyCode::Char('+') => state.step_date(field, 1),
        KeyCode::Char('-') => state.step_date(field, -1),
        KeyCode::Enter => state.focus_next(),
        KeyCode::Char(c) if !(c.is_ascii_digit() || c == '.') => {}
        _ => {
            let area = if field == Field::StartDate {
                &mut state.start_input
            } else {
                &mut state.end_input
            };
            forward_to_text_area(area, key_code);
        }
    }
}

fn forward_to_text_area(area: &mut TextArea<'_>, key_code: KeyCode) {
    let input = Input {
        key: key_code_to_tui_key(key_code),
        ctrl: false,
        alt: false,
        shift: false,
    };
    area.input(input);
}

// Convert crossterm::event::KeyCode to tui_textarea::Key
fn key_code_to_tui_key(key_code: KeyCode) -> Key {
    match key_code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(c) => Key::Char(c),
        // Single-line fields: anything that could add or change lines is dropped.
        _ => Key::Null,
    }
}

fn handle_help_mode(state: &mut FormState, key_code: KeyCode) {
    match key_code {
        KeyCode::Enter | KeyCode::Esc => state.close_help(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_help(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_help(-1),
        KeyCode::Home => state.help_scroll = 0,
        KeyCode::End => state.scroll_help(isize::MAX / 2),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormOptions;

    fn press(state: &mut FormState, code: KeyCode) {
        handle_key_event(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn typing_goes_into_the_path_field() {
        let mut state = FormState::new(None, FormOptions::default());
        for c in "a.xlsx".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.path_input.lines()[0], "a.xls");
    }

    #[test]
    fn date_fields_accept_only_digits_and_dots() {
        let mut state = FormState::new(None, FormOptions::default());
        state.focus = Field::StartDate;
        for c in "0x1.01.2024".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        assert_eq!(state.start_input.lines()[0], "01.01.2024");

        press(&mut state, KeyCode::Char('+'));
        assert_eq!(state.start_input.lines()[0], "02.01.2024");
    }

    #[test]
    fn tab_cycles_focus_and_colon_opens_command_line() {
        let mut state = FormState::new(None, FormOptions::default());
        press(&mut state, KeyCode::Char(':'));
        assert!(matches!(state.input_mode, InputMode::Normal));

        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focus, Field::TeamLeader);
        press(&mut state, KeyCode::Char(':'));
        assert!(matches!(state.input_mode, InputMode::Command));
        press(&mut state, KeyCode::Esc);
        assert!(matches!(state.input_mode, InputMode::Normal));

        press(&mut state, KeyCode::BackTab);
        press(&mut state, KeyCode::BackTab);
        assert_eq!(state.focus, Field::Submit);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut state = FormState::new(None, FormOptions::default());
        handle_key_event(
            &mut state,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::app::{Field, FormState, InputMode, Status};
use crate::utils::{display_width, truncate_to_width};

const LABEL_WIDTH: u16 = 22;
const MAX_PREVIEW_COLUMN_WIDTH: usize = 20;

pub fn ui(f: &mut Frame, state: &mut FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(8), // Form fields
            Constraint::Length(4), // Status and output path
            Constraint::Min(4),    // Preview
            Constraint::Length(6), // Notifications
            Constraint::Length(1), // Status bar / command line
        ])
        .split(f.size());

    draw_title(f, state, chunks[0]);
    draw_form(f, state, chunks[1]);
    draw_status(f, state, chunks[2]);
    draw_preview(f, state, chunks[3]);
    draw_notifications(f, state, chunks[4]);
    draw_status_bar(f, state, chunks[5]);

    if let InputMode::Help = state.input_mode {
        draw_help_popup(f, state, f.size());
    }
}

fn draw_title(f: &mut Frame, state: &FormState, area: Rect) {
    let file_name = state
        .input_path()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "No file".to_string());

    let title = format!(" Excel Data Processor - {} ", file_name);
    let title_widget =
        Paragraph::new(title).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    f.render_widget(title_widget, area);
}

fn draw_form(f: &mut Frame, state: &FormState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightCyan))
        .title(" Filter ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Field::ALL.map(|_| Constraint::Length(1)))
        .split(inner);

    for (idx, field) in Field::ALL.iter().enumerate() {
        if idx >= rows.len() {
            break;
        }
        draw_field(f, state, *field, rows[idx]);
    }
}

fn draw_field(f: &mut Frame, state: &FormState, field: Field, area: Rect) {
    let focused = state.focus == field && matches!(state.input_mode, InputMode::Normal);

    if field == Field::Submit {
        let style = if focused {
            Style::default()
                .bg(Color::LightCyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::LightCyan)
        };
        let button = Paragraph::new(Span::styled(" [ Process Data ] ", style))
            .alignment(Alignment::Center);
        f.render_widget(button, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
        .split(area);

    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(format!(" {}:", field.label())).style(label_style),
        columns[0],
    );

    match field {
        Field::InputFile | Field::StartDate | Field::EndDate => {
            let source = match field {
                Field::InputFile => &state.path_input,
                Field::StartDate => &state.start_input,
                _ => &state.end_input,
            };

            let mut text_area = source.clone();
            text_area.set_cursor_line_style(Style::default());
            if focused {
                text_area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
            } else {
                text_area.set_cursor_style(Style::default());
            }
            f.render_widget(text_area.widget(), columns[1]);
        }
        Field::TeamLeader => {
            let leaders = state.team_leaders();
            let text = match state.selected_team_leader() {
                Some(name) => {
                    let position = state.team_leader_index.unwrap_or(0) + 1;
                    format!("< {} >  ({}/{})", name, position, leaders.len())
                }
                None if state.summary.is_some() => "(no team leaders found)".to_string(),
                None => "(load a workbook first)".to_string(),
            };
            let style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            f.render_widget(Paragraph::new(text).style(style), columns[1]);
        }
        Field::SourceSheet => {
            let mark = if state.include_source_sheet { "[x]" } else { "[ ]" };
            let style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            f.render_widget(
                Paragraph::new(format!("{} add 'Source Sheet' column", mark)).style(style),
                columns[1],
            );
        }
        Field::Submit => {}
    }
}

fn draw_status(f: &mut Frame, state: &FormState, area: Rect) {
    let (title, color) = match state.status {
        Status::Info(_) => (" Status ", Color::White),
        Status::Success(_) => (" Done ", Color::Green),
        Status::Warning(_) => (" Warning ", Color::Yellow),
        Status::Error(_) => (" Error ", Color::LightRed),
    };

    let mut lines = vec![Line::from(Span::styled(
        state.status.message().to_string(),
        Style::default().fg(color),
    ))];

    if let Some(output) = state.output_path() {
        lines.push(Line::from(Span::styled(
            format!("Output: {}", output.display()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let status_widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(status_widget, area);
}

fn draw_preview(f: &mut Frame, state: &FormState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let Some(outcome) = &state.last_outcome else {
        let hint = Paragraph::new("Run 'Process Data' to see the filtered rows here.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block.title(" Preview "));
        f.render_widget(hint, area);
        return;
    };

    let preview = &outcome.preview;
    let title = format!(
        " Preview ({} of {} rows) ",
        preview.rows.len(),
        outcome.rows_written
    );

    let widths: Vec<usize> = preview
        .header
        .iter()
        .enumerate()
        .map(|(col, name)| {
            preview
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(name)))
                .max()
                .unwrap_or(1)
                .min(MAX_PREVIEW_COLUMN_WIDTH)
        })
        .collect();

    let constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length(*w as u16))
        .collect();

    let header_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let header = Row::new(
        preview
            .header
            .iter()
            .zip(&widths)
            .map(|(name, w)| Cell::from(truncate_to_width(name, *w)).style(header_style)),
    )
    .height(1);

    let rows = preview.rows.iter().map(|row| {
        Row::new(
            row.iter()
                .zip(&widths)
                .map(|(value, w)| Cell::from(truncate_to_width(value, *w))),
        )
    });

    let table = Table::new(rows)
        .header(header)
        .block(block.title(title))
        .widths(&constraints)
        .column_spacing(1);

    f.render_widget(table, area);
}

fn draw_notifications(f: &mut Frame, state: &FormState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Notifications ");

    // Show only the most recent notifications that fit
    let height = block.inner(area).height as usize;
    let start_idx = state.notification_messages.len().saturating_sub(height);
    let text = state.notification_messages[start_idx..].join("\n");

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, state: &FormState, area: Rect) {
    match state.input_mode {
        InputMode::Normal => {
            let status = match state.focus {
                Field::InputFile => "Enter=load workbook Tab=next field F1=help Ctrl+P=process Ctrl+Q=quit",
                Field::TeamLeader => "←/→=choose team leader Tab=next field :=command F1=help",
                Field::StartDate | Field::EndDate => {
                    "dd.mm.yyyy  +/-=next/previous day Tab=next field F1=help"
                }
                Field::SourceSheet => "Space=toggle Tab=next field :=command F1=help",
                Field::Submit => "Enter=process data :=command F1=help Ctrl+Q=quit",
            };

            f.render_widget(
                Paragraph::new(status).alignment(Alignment::Left),
                area,
            );
        }
        InputMode::Command => {
            let line = Line::from(vec![
                Span::raw(":"),
                Span::styled(
                    state.input_buffer.clone(),
                    Style::default().fg(Color::Yellow),
                ),
            ]);
            f.render_widget(Paragraph::new(line), area);
        }
        InputMode::Help => {}
    }
}

fn draw_help_popup(f: &mut Frame, state: &mut FormState, area: Rect) {
    f.render_widget(Clear, area);

    let line_count = state.help_text.lines().count() as u16;
    let content_height = line_count + 2;

    let max_line_width = state
        .help_text
        .lines()
        .map(|line| line.len() as u16)
        .max()
        .unwrap_or(40);
    let content_width = max_line_width + 4;

    let popup_width = content_width.min(area.width.saturating_sub(4));
    let popup_height = content_height.min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    state.help_visible_lines = popup_height.saturating_sub(2) as usize;
    let max_scroll = (line_count as usize).saturating_sub(state.help_visible_lines);
    state.help_scroll = state.help_scroll.min(max_scroll);

    let mut title = " [ESC/Enter to close] ".to_string();
    if max_scroll > 0 {
        title.push_str(if state.help_scroll == 0 {
            " [↓ or j to scroll] "
        } else if state.help_scroll >= max_scroll {
            " [↑ or k to scroll] "
        } else {
            " [↑↓ or j/k to scroll] "
        });
    }

    let help_block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightCyan))
        .style(Style::default().bg(Color::Blue).fg(Color::White));

    let help_paragraph = Paragraph::new(state.help_text.clone())
        .block(help_block)
        .wrap(Wrap { trim: false })
        .scroll((state.help_scroll as u16, 0));

    f.render_widget(help_paragraph, popup_area);
}

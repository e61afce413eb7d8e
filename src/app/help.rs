use crate::app::FormState;
use crate::app::InputMode;

impl FormState<'_> {
    pub fn show_help(&mut self) {
        self.help_scroll = 0;

        self.help_text = "FORM:\n\
             Tab, Down   - Next field\n\
             Shift+Tab, Up - Previous field\n\
             Enter       - Load workbook (file field), next field, or run (button)\n\
             Ctrl+P      - Process data from any field\n\
             Ctrl+Q, Ctrl+C - Quit\n\n\
             TEAM LEADER:\n\
             Left/Right, h/l - Choose team leader\n\n\
             DATES (dd.mm.yyyy):\n\
             0-9 and .   - Edit date\n\
             + / -       - Next / previous day\n\n\
             SOURCE SHEET COLUMN:\n\
             Space       - Toggle the extra 'Source Sheet' column\n\n\
             COMMANDS (press : outside text fields):\n\
             :e [path]   - Open a workbook\n\
             :o [path]   - Write output to path\n\
             :o          - Write output next to the input (<name>_filtered.xlsx)\n\
             :source     - Toggle the source sheet column\n\
             :run        - Process data\n\
             :help       - Show this help\n\
             :q          - Quit\n\n\
             OUTPUT:\n\
             The output workbook has one 'Summary' sheet: the header, then every\n\
             row of the selected team leader from every sheet in the date range,\n\
             oldest sheet first. An existing output file is overwritten."
            .to_string();

        self.input_mode = InputMode::Help;
    }

    pub fn scroll_help(&mut self, delta: isize) {
        let line_count = self.help_text.lines().count();
        let max_scroll = line_count.saturating_sub(self.help_visible_lines);
        let next = (self.help_scroll as isize + delta).clamp(0, max_scroll as isize);
        self.help_scroll = next as usize;
    }

    pub fn close_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

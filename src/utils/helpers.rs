#[must_use]
pub fn index_to_col_name(index: usize) -> String {
    let mut col_name = String::new();
    let mut n = index;

    while n > 0 {
        let remainder = (n - 1) % 26;
        col_name.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    if col_name.is_empty() {
        col_name.push('A');
    }

    col_name
}

/// Terminal/column width of `text`: ASCII counts 1, everything else 2.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars()
        .fold(0, |acc, c| acc + if c.is_ascii() { 1 } else { 2 })
}

/// Cuts `text` to fit `width` columns, ending with '…' when something was dropped.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }

    let mut result = String::with_capacity(width);
    let mut current_width = 0;

    for c in text.chars() {
        let char_width = if c.is_ascii() { 1 } else { 2 };
        if current_width + char_width < width {
            result.push(c);
            current_width += char_width;
        } else {
            break;
        }
    }

    result.push('…');
    result
}

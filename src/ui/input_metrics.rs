use unicode_width::UnicodeWidthChar;

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_display_width).sum()
}

pub fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Soft-wrap editor text into rows of at most `width` columns. Hard newlines
/// always start a row; a wide char never splits across rows.
pub fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut used = 0usize;

    for ch in input.chars() {
        match ch {
            '\r' => continue,
            '\n' => {
                rows.push(String::new());
                used = 0;
            }
            _ => {
                let ch_width = char_display_width(ch);
                if used > 0 && used + ch_width > width {
                    rows.push(String::new());
                    used = 0;
                }
                if let Some(row) = rows.last_mut() {
                    row.push(ch);
                }
                used += ch_width;
            }
        }
    }
    rows
}

/// Visual row and column of the byte cursor under `wrap_input_lines`.
pub fn cursor_row_col(input: &str, cursor_byte: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let cursor_byte = clamp_to_char_boundary_left(input, cursor_byte);
    let (mut row, mut col) = (0usize, 0usize);

    for ch in input[..cursor_byte].chars() {
        match ch {
            '\r' => {}
            '\n' => {
                row += 1;
                col = 0;
            }
            _ => {
                let ch_width = char_display_width(ch);
                if col > 0 && col + ch_width > width {
                    row += 1;
                    col = 0;
                }
                col += ch_width;
            }
        }
    }

    if col >= width {
        row += 1;
        col = 0;
    }
    (row, col)
}

/// Cut `text` to `max_width` columns, ending in "..." when anything was lost.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width < 4 {
        return take_width(text, max_width);
    }
    let mut out = take_width(text, max_width - 3);
    out.push_str("...");
    out
}

fn take_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

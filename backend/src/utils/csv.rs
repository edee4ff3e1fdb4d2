//! CSV rendering for the manager export.

/// Leading characters that make spreadsheet applications evaluate a cell.
const FORMULA_TRIGGERS: &[char] = &['=', '+', '-', '@', '\t', '\r'];

fn push_cell(buffer: &mut String, value: &str) {
    buffer.push('"');
    if value.starts_with(FORMULA_TRIGGERS) {
        buffer.push('\'');
    }
    for ch in value.chars() {
        if ch == '"' {
            buffer.push('"');
        }
        buffer.push(ch);
    }
    buffer.push('"');
}

/// Appends one row. Every cell is quoted, and cells that would be read as a
/// formula get a leading single quote.
pub fn append_csv_row<S: AsRef<str>>(buffer: &mut String, fields: &[S]) {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            buffer.push(',');
        }
        push_cell(buffer, field.as_ref());
    }
    buffer.push('\n');
}

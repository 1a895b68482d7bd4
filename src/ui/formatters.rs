use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use crate::core::entry::ConnectionStatus;

/// Colored display label for a connection status
pub fn status_label(status: ConnectionStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        ConnectionStatus::Online => text.green().bold(),
        ConnectionStatus::Offline => text.red().bold(),
        ConnectionStatus::Checking => text.yellow(),
        ConnectionStatus::Waiting => text.yellow().dimmed(),
        ConnectionStatus::Unknown => text.dimmed(),
    }
}

/// Pad a cell to `width` display columns, accounting for wide characters
/// (host names pasted from documentation occasionally carry them)
pub fn pad_cell(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(current);
    format!("{}{}", text, " ".repeat(padding))
}

/// Display width of a cell
pub fn cell_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

//! Pure text layout for help, tables and key lists.
//!
//! Width calculations use display width rather than byte length, ignoring
//! color escapes, so columns line up with wide characters and styled cells.

use super::styles::{names, paint};
use unicode_width::UnicodeWidthStr;

/// Spaces between table columns.
pub const COLUMN_GAP: usize = 2;

/// Removes surrounding blank lines and the indentation shared by every
/// non-blank line, so help can be written as an indented string literal.
pub fn normalize_help(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return String::new(),
    };
    let body = &lines[first..=last];

    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l[indent..].trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_width(cell: &str) -> usize {
    console::strip_ansi_codes(cell).width()
}

fn pad_to(cell: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(cell));
    format!("{}{}", cell, " ".repeat(padding))
}

/// Lays out rows under optional headers with every column padded to its
/// widest cell. Returns one string per output line.
pub fn table_lines(headers: &[&str], rows: &[Vec<String>], colors: bool) -> Vec<String> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0; columns];
    for (i, header) in headers.iter().enumerate() {
        widths[i] = widths[i].max(header.width());
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let gap = " ".repeat(COLUMN_GAP);
    let layout = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_to(cell, widths[i]))
            .collect::<Vec<_>>()
            .join(&gap)
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if !headers.is_empty() {
        let header_line = layout(headers.iter().map(|h| h.to_string()).collect());
        lines.push(paint(&header_line, names::TABLE_HEADER, colors));
    }
    for row in rows {
        lines.push(layout(row.clone()));
    }
    lines
}

/// Lays out `key  value` pairs with the values aligned.
pub fn key_list_lines<K, V>(pairs: &[(K, V)], colors: bool) -> Vec<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let key_width = pairs
        .iter()
        .map(|(k, _)| k.as_ref().width())
        .max()
        .unwrap_or(0);

    pairs
        .iter()
        .map(|(k, v)| {
            let key = pad_to(k.as_ref(), key_width);
            format!(
                "{}{}{}",
                paint(&key, names::LIST_KEY, colors),
                " ".repeat(COLUMN_GAP),
                v.as_ref()
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

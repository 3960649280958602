//! Text image literals
//!
//! A literal is a grid of one-character cells, one row per line:
//!
//! ```text
//! . . 2 . .
//! 2 2 2 2 2
//! . . 2 . .
//! ```
//!
//! `.` (or `0`) is transparent and `1`-`9`, `a`-`f` (either case) are palette
//! indices. Whitespace between cells is optional, blank lines are skipped and
//! lines starting with `#` are comments.

use thiserror::Error;

use crate::bitmap::Bitmap;

/// Error type for literal parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// No rows in the literal
    #[error("image literal is empty")]
    Empty,
    /// A cell is not `.` or a hex digit
    #[error("line {line}, column {column}: invalid pixel '{found}', expected '.' or 0-9/a-f")]
    InvalidCell { line: usize, column: usize, found: char },
    /// Rows have different widths
    #[error("line {line}: row has {found} pixels, expected {expected}")]
    RaggedRow { line: usize, expected: usize, found: usize },
}

/// Parse a single literal cell into a palette index.
pub fn parse_cell(c: char) -> Option<u8> {
    match c {
        '.' => Some(0),
        _ => c.to_digit(16).map(|d| d as u8),
    }
}

/// Character used for a palette index when formatting.
pub fn format_cell(index: u8) -> char {
    match index {
        0 => '.',
        i => std::char::from_digit((i & 0x0F) as u32, 16).unwrap_or('.'),
    }
}

/// Parse a literal into a bitmap.
///
/// # Examples
///
/// ```
/// use spritefx::literal::parse_literal;
///
/// let img = parse_literal(". 2 .\n2 2 2").unwrap();
/// assert_eq!(img.dimensions(), (3, 2));
/// assert_eq!(img.get_pixel(1, 0), 2);
/// ```
pub fn parse_literal(text: &str) -> Result<Bitmap, LiteralError> {
    let mut rows: Vec<Vec<u8>> = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut row = Vec::new();
        for (column, c) in line.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let index = parse_cell(c).ok_or(LiteralError::InvalidCell {
                line: line_idx + 1,
                column: column + 1,
                found: c,
            })?;
            row.push(index);
        }

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(LiteralError::RaggedRow {
                    line: line_idx + 1,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LiteralError::Empty);
    }
    Ok(Bitmap::from_rows(&rows))
}

/// Format a bitmap as a space-separated literal, one row per line.
pub fn format_literal(bitmap: &Bitmap) -> String {
    let mut out = String::new();
    for y in 0..bitmap.height() as i32 {
        let row: Vec<String> = (0..bitmap.width() as i32)
            .map(|x| format_cell(bitmap.get_pixel(x, y)).to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

//! Snapshot parsing.
//!
//! The exporter writes a header line of column labels and a separator line, then one line
//! per grid row:
//!
//! ```text
//! y/x |   1 |   2 |   3 |
//! ----------------------
//!   1 | baba | | text_baba |
//!   2 | | rock<text_is | |
//! ```
//!
//! The leading row label before the first delimiter is discarded.

use crate::config::SnapshotConfig;
use crate::error::ParseError;
use crate::grid::Grid;

/// Parse a raw snapshot into a grid of token stacks
pub fn parse_snapshot(text: &str, config: &SnapshotConfig) -> Result<Grid, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < config.header_lines {
        return Err(ParseError::MissingHeader {
            expected: config.header_lines,
            found: lines.len(),
        });
    }

    // Column labels on the first header line declare the width, when present
    let declared = match lines.first() {
        Some(header) if config.header_lines > 0 => {
            let labels = split_columns(header, config.column_delimiter);
            labels.iter().filter(|l| !l.is_empty()).count()
        }
        _ => 0,
    };

    let mut rows: Vec<Vec<Vec<String>>> = Vec::new();
    for line in &lines[config.header_lines..] {
        if line.trim().is_empty() {
            continue;
        }
        let row: Vec<Vec<String>> = split_columns(line, config.column_delimiter)
            .into_iter()
            .map(|cell| split_stack(cell, config.stack_delimiter))
            .collect();
        rows.push(row);
    }

    let Some(first) = rows.first() else {
        return Err(ParseError::Empty);
    };

    let expected = if declared > 0 { declared } else { first.len() };
    if expected == 0 {
        return Err(ParseError::Empty);
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(ParseError::RaggedRow {
                row: i + 1,
                expected,
                found: row.len(),
            });
        }
    }

    let grid = Grid::from_rows(rows);
    log::debug!("parsed snapshot: {}x{} cells", grid.cols, grid.rows);
    Ok(grid)
}

/// Cell texts of one line: the row label is dropped, as is the empty tail after a closing delimiter
fn split_columns(line: &str, delimiter: char) -> Vec<&str> {
    let line = line.trim_end();
    let line = line.strip_suffix(delimiter).unwrap_or(line);
    line.split(delimiter).skip(1).map(str::trim).collect()
}

fn split_stack(cell: &str, delimiter: char) -> Vec<String> {
    cell.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

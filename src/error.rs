//! Error types for snapshot queries.
//!
//! "No path" is deliberately absent here: planners report it as `None`.

use thiserror::Error;

use crate::cell::Cell;

/// A malformed snapshot. Fatal to the query that parsed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("snapshot has no grid rows")]
    Empty,

    #[error("snapshot header is missing: expected {expected} header lines, found {found}")]
    MissingHeader { expected: usize, found: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] ParseError),

    /// No entity currently holds the `you` rule, or none of them is on the grid.
    #[error("no controlled entity: nothing currently holds the 'you' rule")]
    InvalidControlledEntity,

    #[error("cell {cell} lies outside the {width}x{height} grid")]
    CellOutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

use std::fmt;

use crate::cell::Cell;
use crate::config::{BlockingPolicy, EngineConfig};
use crate::grid::{is_text, Grid};
use crate::rules::RuleSet;

impl BlockingPolicy {
    /// Whether an occupant `token` blocks `controlled` under `rules`
    pub fn blocks(&self, token: &str, controlled: &str, rules: &RuleSet) -> bool {
        match self {
            BlockingPolicy::Unconditional { state } => rules.contains(token, state),
            BlockingPolicy::Conditional { requires, state } => {
                rules.contains(token, state) && rules.contains(controlled, requires)
            }
        }
    }
}

/// Open/blocked map for one controlled entity under one text-avoidance setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassabilityGrid {
    pub rows: usize,
    pub cols: usize,
    blocked: Vec<bool>,
}

impl PassabilityGrid {
    /// Check if 0-indexed (x, y) is blocked; out of bounds is considered blocked
    pub fn is_blocked(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return true;
        }
        self.blocked[x as usize + y as usize * self.cols]
    }

    /// Check a public cell
    pub fn is_blocked_cell(&self, cell: Cell) -> bool {
        self.is_blocked(cell.x as i64 - 1, cell.y as i64 - 1)
    }

    /// Blocked cells in public coordinates, row-major
    pub fn blocked_cells(&self) -> Vec<Cell> {
        self.blocked
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(id, _)| Cell::from_index(id % self.cols, id / self.cols))
            .collect()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }
}

impl fmt::Display for PassabilityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let symbol = if self.blocked[x + y * self.cols] { '█' } else { '.' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build the passability grid for `controlled`
/// A cell is blocked when any occupant is caught by a blocking policy, or, with
/// `avoid_text`, when any occupant is a rule block.
pub fn passability(
    grid: &Grid,
    rules: &RuleSet,
    controlled: &str,
    avoid_text: bool,
    config: &EngineConfig,
) -> PassabilityGrid {
    let text_prefix = &config.snapshot.text_prefix;
    let policies = &config.passability.blocking;

    let blocked: Vec<bool> = grid
        .iter()
        .map(|(_, _, tokens)| {
            tokens.iter().any(|token| {
                (avoid_text && is_text(token, text_prefix))
                    || policies.iter().any(|p| p.blocks(token, controlled, rules))
            })
        })
        .collect();

    let result = PassabilityGrid {
        rows: grid.rows,
        cols: grid.cols,
        blocked,
    };
    log::debug!(
        "passability for '{}' (avoid_text={}): {} of {} cells blocked",
        controlled,
        avoid_text,
        result.blocked_count(),
        grid.rows * grid.cols
    );
    result
}

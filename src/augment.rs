use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::{Cell, Direction};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::level::Level;

/// A position a move option wants to reach, and the direction of the last step onto it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: i32,
    pub y: i32,
    pub last_move: Direction,
}

impl Waypoint {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position (x,y): ({},{}), last move: {}", self.x, self.y, self.last_move)
    }
}

/// A candidate plan proposed by the decision maker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub moves: Vec<Waypoint>,
    pub goal: String,
}

/// The list of candidates as the decision maker sends it, wrapped in `options`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOptions {
    pub options: Vec<MoveOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedMoveOption {
    #[serde(flatten)]
    pub option: MoveOption,
    pub is_valid: bool,
}

impl fmt::Display for AugmentedMoveOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Moves:")?;
        for waypoint in &self.option.moves {
            writeln!(f, "  {}", waypoint)?;
        }
        writeln!(f, "Goal of moves: {}", self.option.goal)?;
        if self.is_valid {
            write!(f, "The moves are valid: every position can be reached from the current state.")
        } else {
            write!(f, "The moves are not valid: a position in the list cannot be reached. Do not pursue this option.")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AugmentedMoveOptions {
    pub options: Vec<AugmentedMoveOption>,
}

impl AugmentedMoveOptions {
    pub fn valid(&self) -> impl Iterator<Item = &AugmentedMoveOption> {
        self.options.iter().filter(|o| o.is_valid)
    }
}

impl fmt::Display for AugmentedMoveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move options:")?;
        for (i, option) in self.options.iter().enumerate() {
            write!(f, "\n- Option {}:", i + 1)?;
            for line in option.to_string().lines() {
                write!(f, "\n    {}", line)?;
            }
        }
        Ok(())
    }
}

/// Mark each option valid when every waypoint has a route from the current position.
/// Waypoints outside the grid make an option invalid; a level without a controlled entity is an error.
pub fn augment_options(level: &Level<'_>, options: Vec<MoveOption>) -> Result<Vec<AugmentedMoveOption>> {
    options
        .into_iter()
        .map(|option| {
            let is_valid = is_valid(level, &option)?;
            log::debug!("move option '{}' valid={}", option.goal, is_valid);
            Ok(AugmentedMoveOption { option, is_valid })
        })
        .collect()
}

fn is_valid(level: &Level<'_>, option: &MoveOption) -> Result<bool> {
    for waypoint in &option.moves {
        match level.route(waypoint.cell(), waypoint.last_move) {
            Ok(Some(_)) => {}
            Ok(None) | Err(EngineError::CellOutOfBounds { .. }) => return Ok(false),
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Parse `snapshot` and validate `options` against it
pub fn augment_game_moves(snapshot: &str, options: MoveOptions) -> Result<AugmentedMoveOptions> {
    augment_game_moves_with(snapshot, options, &EngineConfig::default())
}

pub fn augment_game_moves_with(
    snapshot: &str,
    options: MoveOptions,
    config: &EngineConfig,
) -> Result<AugmentedMoveOptions> {
    let level = Level::parse(snapshot, config)?;
    Ok(AugmentedMoveOptions {
        options: augment_options(&level, options.options)?,
    })
}

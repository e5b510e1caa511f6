pub mod augment;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod insights;
pub mod level;
pub mod passability;
pub mod pathfinding;
pub mod query;
pub mod rules;
pub mod snapshot;

pub use augment::{augment_game_moves, AugmentedMoveOptions, MoveOptions};
pub use cell::{Cell, Direction};
pub use config::EngineConfig;
pub use error::{EngineError, ParseError, Result};
pub use grid::Grid;
pub use insights::GameInsights;
pub use level::{Level, Located, Route};
pub use pathfinding::MoveSequence;
pub use query::{extract_rules, find_path, locate, query_insights};
pub use rules::{Rule, RuleSet};

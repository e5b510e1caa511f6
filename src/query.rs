//! Snapshot-level entry points.
//!
//! Each call parses the snapshot from scratch, reads the rules it spells out and
//! discards everything on return. The plain functions use [`EngineConfig::default`];
//! the `_with` variants take an explicit configuration.

use crate::cell::{Cell, Direction};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::insights::{self, EntityPosition, GameInsights};
use crate::level::Level;
use crate::pathfinding::MoveSequence;
use crate::rules::RuleSet;

pub fn extract_rules(snapshot: &str) -> Result<RuleSet> {
    extract_rules_with(snapshot, &EngineConfig::default())
}

pub fn extract_rules_with(snapshot: &str, config: &EngineConfig) -> Result<RuleSet> {
    let level = Level::parse(snapshot, config)?;
    Ok(level.rules().clone())
}

/// Cells of the entities currently holding `state`, e.g. `you` or `win`
pub fn locate(snapshot: &str, state: &str) -> Result<Vec<Cell>> {
    locate_with(snapshot, state, &EngineConfig::default())
}

pub fn locate_with(snapshot: &str, state: &str, config: &EngineConfig) -> Result<Vec<Cell>> {
    let level = Level::parse(snapshot, config)?;
    Ok(level.positions(state))
}

/// Moves that bring a controlled entity onto `goal`, travelling in `approach` on the last step.
/// `Ok(None)` means no path under the current rules.
pub fn find_path(snapshot: &str, goal: Cell, approach: Direction) -> Result<Option<MoveSequence>> {
    find_path_with(snapshot, goal, approach, &EngineConfig::default())
}

pub fn find_path_with(
    snapshot: &str,
    goal: Cell,
    approach: Direction,
    config: &EngineConfig,
) -> Result<Option<MoveSequence>> {
    let level = Level::parse(snapshot, config)?;
    Ok(level.route(goal, approach)?.map(|route| route.moves))
}

pub fn query_insights(snapshot: &str) -> Result<GameInsights> {
    query_insights_with(snapshot, &EngineConfig::default())
}

pub fn query_insights_with(snapshot: &str, config: &EngineConfig) -> Result<GameInsights> {
    let level = Level::parse(snapshot, config)?;
    insights::insights(&level)
}

pub fn reachable_entities(snapshot: &str) -> Result<Vec<EntityPosition>> {
    reachable_entities_with(snapshot, &EngineConfig::default())
}

pub fn reachable_entities_with(snapshot: &str, config: &EngineConfig) -> Result<Vec<EntityPosition>> {
    let level = Level::parse(snapshot, config)?;
    insights::reachable_entities(&level)
}

pub fn text_blocks(snapshot: &str) -> Result<Vec<EntityPosition>> {
    let config = EngineConfig::default();
    let level = Level::parse(snapshot, &config)?;
    Ok(insights::text_blocks(&level))
}

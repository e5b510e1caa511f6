use serde::Serialize;

use crate::cell::{Cell, Direction};
use crate::config::{EngineConfig, GoalPolicy};
use crate::error::{EngineError, Result};
use crate::grid::{is_text, Grid};
use crate::passability::{passability, PassabilityGrid};
use crate::pathfinding::{plan_route, MoveSequence};
use crate::rules::{extract_rules, RuleSet, YOU};
use crate::snapshot::parse_snapshot;

/// An entity token found at a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Located {
    pub cell: Cell,
    pub entity: String,
}

/// A planned route for one controlled entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Controlled entity the route was planned for
    pub entity: String,
    pub start: Cell,
    pub goal: Cell,
    pub approach: Direction,
    pub moves: MoveSequence,
}

/// One parsed snapshot together with the rules it currently spells out.
/// Built per query and dropped with it.
#[derive(Debug, Clone)]
pub struct Level<'c> {
    grid: Grid,
    rules: RuleSet,
    config: &'c EngineConfig,
}

impl<'c> Level<'c> {
    pub fn parse(snapshot: &str, config: &'c EngineConfig) -> Result<Self> {
        let grid = parse_snapshot(snapshot, &config.snapshot)?;
        let rules = extract_rules(&grid, &config.snapshot);
        Ok(Level { grid, rules, config })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    pub fn is_text(&self, token: &str) -> bool {
        is_text(token, &self.config.snapshot.text_prefix)
    }

    /// Non-text entities holding `state`, in grid scan order (top to bottom, left to right)
    pub fn locate(&self, state: &str) -> Vec<Located> {
        let entities = self.rules.entities_with(state);
        if entities.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for (x, y, tokens) in self.grid.iter() {
            for token in tokens {
                if !self.is_text(token) && entities.contains(&token.as_str()) {
                    found.push(Located {
                        cell: Cell::from_index(x, y),
                        entity: token.clone(),
                    });
                }
            }
        }
        found
    }

    /// Distinct cells holding `state`, in scan order
    pub fn positions(&self, state: &str) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.locate(state).into_iter().map(|l| l.cell).collect();
        cells.dedup();
        cells
    }

    /// Controlled entities on the grid; an error when nothing holds `you`
    pub fn controlled(&self) -> Result<Vec<Located>> {
        let yous = self.locate(YOU);
        if yous.is_empty() {
            return Err(EngineError::InvalidControlledEntity);
        }
        Ok(yous)
    }

    pub fn passability(&self, controlled: &str, avoid_text: bool) -> PassabilityGrid {
        passability(&self.grid, &self.rules, controlled, avoid_text, self.config)
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.grid.contains(cell) {
            Ok(())
        } else {
            Err(EngineError::CellOutOfBounds {
                cell,
                width: self.grid.cols,
                height: self.grid.rows,
            })
        }
    }

    /// Shortest route onto `goal` arriving in `approach`.
    /// Controlled entities are tried in scan order; the first one with a route wins.
    pub fn route(&self, goal: Cell, approach: Direction) -> Result<Option<Route>> {
        self.check_bounds(goal)?;
        let controlled = self.controlled()?;

        for you in controlled {
            let search = self.passability(&you.entity, true);
            let goal_check = match self.config.passability.goal_policy {
                GoalPolicy::AllowTextGoal => self.passability(&you.entity, false),
                GoalPolicy::AvoidTextGoal => search.clone(),
            };

            if let Some(moves) = plan_route(&search, &goal_check, you.cell, goal, approach) {
                log::debug!(
                    "route for '{}' {} -> {} via {}: {}",
                    you.entity,
                    you.cell,
                    goal,
                    approach,
                    moves
                );
                return Ok(Some(Route {
                    entity: you.entity,
                    start: you.cell,
                    goal,
                    approach,
                    moves,
                }));
            }
        }
        Ok(None)
    }

    /// Whether any approach direction yields a route onto `goal`
    pub fn is_reachable(&self, goal: Cell) -> Result<bool> {
        for approach in Direction::ALL {
            if self.route(goal, approach)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

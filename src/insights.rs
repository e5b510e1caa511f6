use serde::Serialize;
use std::fmt;

use crate::cell::{Cell, Direction};
use crate::error::{EngineError, Result};
use crate::level::{Level, Route};
use crate::rules::{RuleSet, WIN, YOU};

/// A token on the grid worth reporting to the decision maker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPosition {
    pub x: i32,
    pub y: i32,
    pub entity: String,
}

impl EntityPosition {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

impl fmt::Display for EntityPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.entity)
    }
}

/// Read-only situational digest of one snapshot.
/// An empty `you_positions` means nothing is controlled; `you_rule_active` tells whether
/// that is because no `you` rule is spelled out or because its entity is off the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInsights {
    pub active_rules: RuleSet,
    /// Relevant entities grouped by row, top to bottom
    pub relevant_entities: Vec<Vec<EntityPosition>>,
    /// Relevant entities some controlled entity can currently walk onto
    pub reachable_entities: Vec<EntityPosition>,
    pub you_positions: Vec<Cell>,
    /// Some rule currently reads `... is you`
    pub you_rule_active: bool,
    pub win_positions: Vec<Cell>,
    /// Shortest route onto any win cell, over every approach direction
    pub best_path_to_win: Option<Route>,
}

/// Configured relevant entities and every text block, in scan order
pub fn relevant_entities(level: &Level<'_>) -> Vec<EntityPosition> {
    let relevant = &level.config().insights.relevant_entities;
    level
        .grid()
        .iter()
        .flat_map(move |(x, y, tokens)| {
            tokens
                .iter()
                .filter(move |t| level.is_text(t) || relevant.iter().any(|r| r == *t))
                .map(move |t| position(x, y, t))
        })
        .collect()
}

/// Every rule/text block on the grid, marker included
pub fn text_blocks(level: &Level<'_>) -> Vec<EntityPosition> {
    level
        .grid()
        .iter()
        .flat_map(move |(x, y, tokens)| {
            tokens
                .iter()
                .filter(move |t| level.is_text(t))
                .map(move |t| position(x, y, t))
        })
        .collect()
}

/// Relevant entities with a route from some approach direction
pub fn reachable_entities(level: &Level<'_>) -> Result<Vec<EntityPosition>> {
    let mut reachable = Vec::new();
    for entity in relevant_entities(level) {
        if level.is_reachable(entity.cell())? {
            reachable.push(entity);
        }
    }
    Ok(reachable)
}

/// Shortest winning route, or None when nothing is `win` or nothing connects.
/// Ties keep the first found, trying approach directions in up/down/left/right order.
pub fn best_path_to_win(level: &Level<'_>) -> Result<Option<Route>> {
    let wins = level.positions(WIN);
    let mut best: Option<Route> = None;
    for approach in Direction::ALL {
        for &goal in &wins {
            let Some(route) = level.route(goal, approach)? else {
                continue;
            };
            if best.as_ref().map_or(true, |b| route.moves.len() < b.moves.len()) {
                best = Some(route);
            }
        }
    }
    Ok(best)
}

fn group_by_row(entities: Vec<EntityPosition>) -> Vec<Vec<EntityPosition>> {
    let mut rows: Vec<Vec<EntityPosition>> = Vec::new();
    for entity in entities {
        match rows.last_mut() {
            Some(row) if row[0].y == entity.y => row.push(entity),
            _ => rows.push(vec![entity]),
        }
    }
    rows
}

fn position(x: usize, y: usize, token: &str) -> EntityPosition {
    let cell = Cell::from_index(x, y);
    EntityPosition {
        x: cell.x,
        y: cell.y,
        entity: token.to_string(),
    }
}

/// Compose the insight digest. A level without a controlled entity still yields a digest,
/// with no YOU positions and no winning route.
pub fn insights(level: &Level<'_>) -> Result<GameInsights> {
    let you_positions = level.positions(YOU);
    let win_positions = level.positions(WIN);

    let (reachable, best) = match (reachable_entities(level), best_path_to_win(level)) {
        (Ok(reachable), Ok(best)) => (reachable, best),
        (Err(EngineError::InvalidControlledEntity), _) | (_, Err(EngineError::InvalidControlledEntity)) => {
            (Vec::new(), None)
        }
        (Err(e), _) | (_, Err(e)) => return Err(e),
    };

    log::debug!(
        "insights: {} rules, {} you, {} win, path to win: {}",
        level.rules().len(),
        you_positions.len(),
        win_positions.len(),
        best.is_some()
    );

    Ok(GameInsights {
        active_rules: level.rules().clone(),
        relevant_entities: group_by_row(relevant_entities(level)),
        reachable_entities: reachable,
        you_positions,
        you_rule_active: level.rules().has_state(YOU),
        win_positions,
        best_path_to_win: best,
    })
}

fn cell_list(cells: &[Cell]) -> String {
    cells.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for GameInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<String> = self
            .active_rules
            .iter()
            .map(|r| r.to_string().to_uppercase())
            .collect();
        writeln!(f, "The current active rules are:")?;
        writeln!(f, "{}", rules.join(", "))?;
        writeln!(f)?;

        writeln!(f, "The coordinates of relevant entities are:")?;
        for row in &self.relevant_entities {
            let row: Vec<String> = row.iter().map(|e| e.to_string()).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        writeln!(f)?;

        writeln!(f, "'YOU' are currently at position(s): [{}].", cell_list(&self.you_positions))?;
        if self.you_positions.is_empty() {
            if self.you_rule_active {
                writeln!(f, "A 'YOU' rule is active, but no entity holding it is on the grid.")?;
            } else {
                writeln!(f, "No rule currently makes anything 'YOU'.")?;
            }
        }
        writeln!(f, "Winning positions are currently at: [{}].", cell_list(&self.win_positions))?;
        match &self.best_path_to_win {
            Some(route) => write!(
                f,
                "There currently is a path to the win position {} (last move {}). Executing it wins the level:\n{}",
                route.goal, route.approach, route.moves
            ),
            None => write!(
                f,
                "There currently exists no path to a win position! The game rules have to change to win the level."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    const LEVEL: &str = "\
y/x |   1 |   2 |   3 |   4 |
-----------------------------
  1 | text_baba | text_is | text_you |  |
  2 | baba |  | rock | flag |
  3 | text_flag | text_is | text_win |  |
";

    #[test]
    fn relevant_entities_include_text_and_known_nouns() {
        let config = EngineConfig::default();
        let level = Level::parse(LEVEL, &config).unwrap();
        let entities = relevant_entities(&level);
        assert_eq!(entities.len(), 9);
        assert_eq!(entities[3], EntityPosition { x: 1, y: 2, entity: "baba".into() });
        assert_eq!(text_blocks(&level).len(), 6);
    }

    #[test]
    fn relevant_entities_group_by_row() {
        let config = EngineConfig::default();
        let level = Level::parse(LEVEL, &config).unwrap();
        let digest = insights(&level).unwrap();
        let sizes: Vec<usize> = digest.relevant_entities.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 3]);
    }

    #[test]
    fn best_path_walks_onto_flag() {
        let config = EngineConfig::default();
        let level = Level::parse(LEVEL, &config).unwrap();
        let digest = insights(&level).unwrap();
        assert_eq!(digest.you_positions, vec![Cell::new(1, 2)]);
        assert_eq!(digest.win_positions, vec![Cell::new(4, 2)]);
        let route = digest.best_path_to_win.unwrap();
        assert_eq!(route.approach, Direction::Right);
        assert_eq!(route.moves.to_command_string(), "right,right,right");
    }

    #[test]
    fn reachable_skips_walled_off_entities() {
        let config = EngineConfig::default();
        let level = Level::parse(LEVEL, &config).unwrap();
        let reachable = reachable_entities(&level).unwrap();
        let names: Vec<&str> = reachable.iter().map(|e| e.entity.as_str()).collect();
        assert!(names.contains(&"rock"));
        assert!(names.contains(&"flag"));
        assert!(names.contains(&"baba"));
    }

    #[test]
    fn digest_without_you_has_no_route() {
        let text = LEVEL.replace("text_you", "text_win");
        let config = EngineConfig::default();
        let level = Level::parse(&text, &config).unwrap();
        let digest = insights(&level).unwrap();
        assert!(digest.you_positions.is_empty());
        assert!(digest.best_path_to_win.is_none());
        assert!(digest.reachable_entities.is_empty());
        assert!(!digest.you_rule_active);
        let text = digest.to_string();
        assert!(text.contains("no path to a win position"));
        assert!(text.contains("No rule currently makes anything 'YOU'."));
    }

    #[test]
    fn digest_tells_absent_you_entity_from_missing_rule() {
        let text = LEVEL.replace("text_baba", "text_keke");
        let config = EngineConfig::default();
        let level = Level::parse(&text, &config).unwrap();
        let digest = insights(&level).unwrap();
        assert!(digest.you_positions.is_empty());
        assert!(digest.you_rule_active);
        assert!(digest.best_path_to_win.is_none());
        assert!(digest.to_string().contains("no entity holding it is on the grid"));

        let full = insights(&Level::parse(LEVEL, &config).unwrap()).unwrap();
        assert!(full.you_rule_active);
    }

    #[test]
    fn display_lists_rules_in_upper_case() {
        let config = EngineConfig::default();
        let level = Level::parse(LEVEL, &config).unwrap();
        let text = insights(&level).unwrap().to_string();
        assert!(text.contains("BABA IS YOU"));
        assert!(text.contains("FLAG IS WIN"));
        assert!(text.contains("right,right,right"));
    }
}

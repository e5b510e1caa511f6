use crate::cell::{Cell, Direction};
use crate::passability::PassabilityGrid;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

/// Neighbour expansion order: down, up, right, left
const NEIGHBOURS: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

/// A node in the pathfinding search
#[derive(Debug, Clone)]
struct PathNode {
    position: Cell,
    cost: i32,
    estimate: i32,
    /// Push order, so equal estimates pop first-seen first
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.estimate == other.estimate && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// 4-directional A* with unit edge cost and Manhattan heuristic.
/// Returns the cells after `start` up to and including `goal`; an empty path when
/// `start == goal`; None when `goal` is blocked or unreachable.
/// Blocked cells are never expanded. `start` itself is not checked: the controlled
/// entity is already standing on it.
pub fn a_star(passable: &PassabilityGrid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(Vec::new());
    }
    if passable.is_blocked_cell(goal) {
        return None;
    }

    let mut queue: BinaryHeap<PathNode> = BinaryHeap::new();
    let mut best_costs: HashMap<Cell, i32> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut seq = 0u64;

    best_costs.insert(start, 0);
    queue.push(PathNode {
        position: start,
        cost: 0,
        estimate: start.manhattan(&goal),
        seq,
    });

    let mut iterations = 0;
    while let Some(node) = queue.pop() {
        iterations += 1;
        let pos = node.position;

        // Skip stale entries superseded by a cheaper route
        if best_costs.get(&pos).is_some_and(|&best| node.cost > best) {
            continue;
        }

        log::trace!("[A*] expanding {} cost={} estimate={}", pos, node.cost, node.estimate);

        if pos == goal {
            log::debug!("[A*] reached {} in {} steps after {} expansions", goal, node.cost, iterations);
            return Some(reconstruct(&came_from, start, goal));
        }

        for dir in NEIGHBOURS {
            let next = pos.step(dir);
            if passable.is_blocked_cell(next) {
                continue;
            }
            let cost = node.cost + 1;
            let improves = match best_costs.get(&next) {
                Some(&best) => cost < best,
                None => true,
            };
            if improves {
                best_costs.insert(next, cost);
                came_from.insert(next, pos);
                seq += 1;
                queue.push(PathNode {
                    position: next,
                    cost,
                    estimate: cost + next.manhattan(&goal),
                    seq,
                });
            }
        }
    }

    log::debug!("[A*] no path {} -> {} after {} expansions", start, goal, iterations);
    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(&prev) => current = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Compile a cell path into moves from consecutive deltas.
/// None if two consecutive cells are not orthogonal neighbours.
pub fn path_to_moves(start: Cell, path: &[Cell]) -> Option<Vec<Direction>> {
    let mut previous = start;
    let mut moves = Vec::with_capacity(path.len());
    for &cell in path {
        moves.push(Direction::from_delta(cell.x - previous.x, cell.y - previous.y)?);
        previous = cell;
    }
    Some(moves)
}

/// Ordered moves for the external executor; the last move is always the approach direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveSequence(Vec<Direction>);

impl MoveSequence {
    pub fn new(moves: Vec<Direction>) -> Self {
        MoveSequence(moves)
    }

    pub fn moves(&self) -> &[Direction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final move onto the goal
    pub fn approach(&self) -> Option<Direction> {
        self.0.last().copied()
    }

    /// Cell reached by applying every move to `start`, ignoring collisions
    pub fn replay(&self, start: Cell) -> Cell {
        self.0.iter().fold(start, |cell, &dir| cell.step(dir))
    }

    /// Comma-separated form accepted by the game's command executor, e.g. `right,right,down`
    pub fn to_command_string(&self) -> String {
        self.0
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_string())
    }
}

impl From<Vec<Direction>> for MoveSequence {
    fn from(moves: Vec<Direction>) -> Self {
        MoveSequence(moves)
    }
}

/// The cell the controlled entity must stand on before its final `approach` move onto `goal`
pub fn approach_cell(goal: Cell, approach: Direction) -> Cell {
    goal.step_back(approach)
}

/// Plan a route from `start` onto `goal`, arriving while moving in `approach`.
/// `goal_check` validates the goal and the approach cell; `search` is the grid the
/// search runs on. An approach cell equal to `start` is never rejected.
/// None when either cell is blocked or nothing connects.
pub fn plan_route(
    search: &PassabilityGrid,
    goal_check: &PassabilityGrid,
    start: Cell,
    goal: Cell,
    approach: Direction,
) -> Option<MoveSequence> {
    if goal_check.is_blocked_cell(goal) {
        log::debug!("goal {} is blocked", goal);
        return None;
    }
    let before = approach_cell(goal, approach);
    if before != start && goal_check.is_blocked_cell(before) {
        log::debug!("approach cell {} for {} from {} is blocked", before, goal, approach);
        return None;
    }

    let path = a_star(search, start, before)?;
    log::trace!("path to approach cell {}: {}", before, format_path(&path));
    let mut moves = path_to_moves(start, &path)?;
    moves.push(approach);
    Some(MoveSequence::new(moves))
}

/// Format path for display
pub fn format_path(path: &[Cell]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#![allow(dead_code)]

use babapath::{Cell, Direction};
use std::collections::{HashSet, VecDeque};

/// Render a token matrix in the exporter's snapshot format.
/// Stacked tokens inside one cell are written as `rock<text_is`.
pub fn render_snapshot(rows: &[Vec<String>]) -> String {
    render_snapshot_with_width(rows, rows.first().map_or(0, Vec::len))
}

/// Same as `render_snapshot`, but the header declares `cols` columns whatever the rows hold
pub fn render_snapshot_with_width(rows: &[Vec<String>], cols: usize) -> String {
    let mut out = String::from("y/x |");
    for x in 1..=cols {
        out.push_str(&format!(" {:>3} |", x));
    }
    let width = out.len();
    out.push('\n');
    out.push_str(&"-".repeat(width));
    out.push('\n');

    for (y, row) in rows.iter().enumerate() {
        out.push_str(&format!("{:>3} |", y + 1));
        for cell in row {
            out.push_str(&format!(" {:<15} |", cell));
        }
        out.push('\n');
    }
    out
}

/// Convenience wrapper for string-literal layouts
pub fn snapshot(rows: &[&[&str]]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    render_snapshot(&rows)
}

/// 5x5 level: baba at (1,1), flag at (1,5), walls down column 2, rule text on the right
pub fn corridor_rows() -> Vec<Vec<String>> {
    let layout: [[&str; 5]; 5] = [
        ["baba", "wall", "text_baba", "text_is", "text_you"],
        ["", "wall", "", "", ""],
        ["", "wall", "text_flag", "text_is", "text_win"],
        ["", "wall", "", "", ""],
        ["flag", "wall", "text_wall", "text_is", "text_stop"],
    ];
    layout
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

pub fn corridor_snapshot() -> String {
    render_snapshot(&corridor_rows())
}

/// Breadth-first distance over open cells, used as an independent oracle for path length
pub fn bfs_distance(open: impl Fn(Cell) -> bool, start: Cell, goal: Cell) -> Option<usize> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back((start, 0usize));

    while let Some((cell, dist)) = queue.pop_front() {
        if cell == goal {
            return Some(dist);
        }
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if open(next) && seen.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    None
}

use crate::cell::Cell;

/// Grid of stacked entity tokens, row-major
/// Each cell holds the tokens occupying it, e.g. `["baba", "text_rock"]`; an empty cell holds none.
/// Built once per snapshot and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Vec<String>>,
}

impl Grid {
    /// Build a grid from rows of cells; every row must already have `cols` entries
    pub(crate) fn from_rows(rows: Vec<Vec<Vec<String>>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        Grid {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// Convert 0-indexed (x, y) coordinates to cell ID
    pub fn get_id(&self, x: usize, y: usize) -> usize {
        x + y * self.cols
    }

    /// Convert cell ID to 0-indexed (x, y) coordinates
    pub fn get_coords(&self, id: usize) -> (usize, usize) {
        (id % self.cols, id / self.cols)
    }

    /// Whether a public cell lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.to_index()
            .is_some_and(|(x, y)| x < self.cols && y < self.rows)
    }

    /// Tokens at 0-indexed (x, y); out of bounds reads as an empty cell
    pub fn tokens(&self, x: usize, y: usize) -> &[String] {
        if x >= self.cols || y >= self.rows {
            return &[];
        }
        &self.cells[self.get_id(x, y)]
    }

    /// Iterate `(x, y, tokens)` row by row, top to bottom, left to right
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &[String])> + '_ {
        self.cells.iter().enumerate().map(move |(id, tokens)| {
            let (x, y) = self.get_coords(id);
            (x, y, tokens.as_slice())
        })
    }

    /// Row `y` as a slice of cells
    pub fn row(&self, y: usize) -> &[Vec<String>] {
        let start = y * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Column `x`, top to bottom
    pub fn column(&self, x: usize) -> Vec<&[String]> {
        (0..self.rows).map(|y| self.tokens(x, y)).collect()
    }
}

/// Whether `token` is a rule/text block under the given marker
pub fn is_text(token: &str, text_prefix: &str) -> bool {
    !text_prefix.is_empty() && token.starts_with(text_prefix)
}

/// Strip the text marker from a rule word, e.g. `text_baba` -> `baba`
pub fn strip_text(token: &str, text_prefix: &str) -> String {
    token.strip_prefix(text_prefix).unwrap_or(token).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn sample() -> Grid {
        Grid::from_rows(vec![
            vec![cell(&["baba"]), cell(&[]), cell(&["rock", "text_win"])],
            vec![cell(&[]), cell(&["wall"]), cell(&[])],
        ])
    }

    #[test]
    fn ids_and_coords_agree() {
        let grid = sample();
        assert_eq!(grid.cols, 3);
        assert_eq!(grid.rows, 2);
        for id in 0..6 {
            let (x, y) = grid.get_coords(id);
            assert_eq!(grid.get_id(x, y), id);
        }
    }

    #[test]
    fn tokens_read_stacks_and_bounds() {
        let grid = sample();
        assert_eq!(grid.tokens(2, 0), &["rock".to_string(), "text_win".to_string()][..]);
        assert!(grid.tokens(5, 5).is_empty());
        assert_eq!(grid.tokens(1, 1), &["wall".to_string()][..]);
        assert!(grid.contains(Cell::new(3, 2)));
        assert!(!grid.contains(Cell::new(4, 1)));
        assert!(!grid.contains(Cell::new(0, 1)));
    }

    #[test]
    fn rows_and_columns() {
        let grid = sample();
        assert_eq!(grid.row(1)[1], cell(&["wall"]));
        let col = grid.column(0);
        assert_eq!(col.len(), 2);
        assert_eq!(col[0], &cell(&["baba"])[..]);
    }

    #[test]
    fn text_marker_helpers() {
        assert!(is_text("text_baba", "text_"));
        assert!(!is_text("baba", "text_"));
        assert_eq!(strip_text("text_baba", "text_"), "baba");
        assert_eq!(strip_text("baba", "text_"), "baba");
    }
}

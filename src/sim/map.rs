//! Arena tile map
//!
//! The play field is a grid of square cells; blocked cells reflect
//! projectiles. Actors are not blocked by walls, only by the arena inset.

use glam::Vec2;

use crate::consts::{CELL_SIZE, MAP_COLS, MAP_ROWS};

/// Default arena: solid border with four pillar pairs
const DEFAULT_LAYOUT: [&str; MAP_ROWS] = [
    "################################",
    "#..............................#",
    "#..............................#",
    "#.....##..............##.......#",
    "#.....##..............##.......#",
    "#..............................#",
    "#..............................#",
    "#...........##....##...........#",
    "#..............................#",
    "#..............................#",
    "#...........##....##...........#",
    "#..............................#",
    "#..............................#",
    "#.....##..............##.......#",
    "#.....##..............##.......#",
    "#..............................#",
    "#..............................#",
    "################################",
];

/// Grid coordinate of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    /// Cell containing a canvas-space point
    pub fn containing(pos: Vec2) -> Self {
        Self {
            col: (pos.x / CELL_SIZE).floor() as i32,
            row: (pos.y / CELL_SIZE).floor() as i32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArenaMap {
    cols: usize,
    rows: usize,
    blocked: Vec<bool>,
}

impl Default for ArenaMap {
    fn default() -> Self {
        Self::from_rows(&DEFAULT_LAYOUT)
    }
}

impl ArenaMap {
    /// Build a map from text rows: `#` is a wall, anything else is open.
    /// Short rows are padded with open cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut blocked = vec![false; cols * rows.len()];
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.bytes().enumerate() {
                blocked[row * cols + col] = ch == b'#';
            }
        }
        Self {
            cols,
            rows: rows.len(),
            blocked,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Whether the cell lies on the grid at all
    pub fn in_grid(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && (cell.col as usize) < self.cols && (cell.row as usize) < self.rows
    }

    /// Walls reflect projectiles; off-grid cells are never walls
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.in_grid(cell) && self.blocked[cell.row as usize * self.cols + cell.col as usize]
    }

    /// Whether a point lies inside the map's pixel extent
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0
            && pos.y >= 0.0
            && pos.x < self.cols as f32 * CELL_SIZE
            && pos.y < self.rows as f32 * CELL_SIZE
    }

    /// Iterate blocked cells (for drawing)
    pub fn walls(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| Cell {
            col: (i % self.cols) as i32,
            row: (i / self.cols) as i32,
        })
    }
}

use crate::cell::Cell;
use crate::common::{ConstraintSet, Position};

use anyhow::{bail, Result};

/// The solver's only view of the world. Implementations return every legal
/// neighbor of `cell` with `g = cell.g + 1`, already filtered for
/// impassable terrain and for positions whose arrival time step (the
/// successor's g) is forbidden by the supplied constraint set. Must be
/// deterministic for identical inputs; the order of successors only affects
/// tie-breaking among equal-cost frontier entries.
pub trait Map {
    fn successors(&self, cell: &Cell, constraints: &ConstraintSet) -> Vec<Cell>;
}

#[derive(Debug, Clone)]
pub struct Tile {
    passable: bool,
    neighbors: Vec<Position>,
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

/// 4-connected grid with unit move costs, built programmatically. Rows are
/// indexed by y, columns by x.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    grid: Vec<Vec<Tile>>,
}

impl GridMap {
    pub fn new(width: usize, height: usize, obstacles: &[Position]) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("map dimensions must be non-zero, got {width}x{height}");
        }

        let mut grid = vec![
            vec![
                Tile {
                    passable: true,
                    neighbors: Vec::new(),
                };
                width
            ];
            height
        ];
        for &(x, y) in obstacles {
            if x >= width || y >= height {
                bail!("obstacle ({x}, {y}) outside {width}x{height} map");
            }
            grid[y][x].passable = false;
        }

        let mut map = GridMap {
            width,
            height,
            grid,
        };
        map.initialize_neighbors();
        Ok(map)
    }

    /// Builds a map from rows of '.' (passable) and '@' (blocked), the same
    /// convention benchmark grids use. Intended for tests and demos.
    pub fn from_ascii(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            bail!("map must have at least one row");
        }
        let width = rows[0].chars().count();

        let mut obstacles = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!("row {y} has {} tiles, expected {width}", row.chars().count());
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '.' => {}
                    '@' | '#' => obstacles.push((x, y)),
                    _ => bail!("unknown map tile {ch:?} at ({x}, {y})"),
                }
            }
        }

        GridMap::new(width, height, &obstacles)
    }

    fn initialize_neighbors(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.grid[y][x].passable {
                    self.grid[y][x].neighbors = self.compute_neighbors(x, y);
                }
            }
        }
    }

    fn compute_neighbors(&self, x: usize, y: usize) -> Vec<Position> {
        let directions = [(0, -1), (0, 1), (-1, 0), (1, 0)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i64 + dx;
            let new_y = y as i64 + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.width as i64
                && new_y < self.height as i64
                && self.grid[new_y as usize][new_x as usize].passable
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn neighbors(&self, x: usize, y: usize) -> &[Position] {
        &self.grid[y][x].neighbors
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.grid[y][x].is_passable()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl Map for GridMap {
    fn successors(&self, cell: &Cell, constraints: &ConstraintSet) -> Vec<Cell> {
        let latest = constraints.latest_time_step();

        // A constrained shortest path, when one exists, needs no more than
        // one visit per tile on top of outwaiting the last constraint, so
        // cutting the expansion off here keeps the frontier finite without
        // losing any optimal path.
        if cell.g >= self.width * self.height + latest {
            return Vec::new();
        }

        let arrival = cell.g + 1;
        let mut successors = Vec::new();

        for &(x, y) in self.neighbors(cell.x, cell.y) {
            if !constraints.is_forbidden((x, y), arrival) {
                successors.push(cell.step_to(x, y));
            }
        }

        // Waiting in place is only useful while a constraint ahead can still
        // force a delay; afterwards it can only lengthen the path.
        if cell.g < latest
            && self.is_passable(cell.x, cell.y)
            && !constraints.is_forbidden(cell.position(), arrival)
        {
            successors.push(cell.step_to(cell.x, cell.y));
        }

        successors
    }
}

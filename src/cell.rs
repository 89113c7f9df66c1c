use crate::common::Position;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A point in the single-agent search space. Besides its coordinates a cell
/// carries the accumulated path cost `g`, the frozen total estimate
/// `g + h` set when the cell is generated, and an owning link to the cell
/// that produced it, which makes the explored path graph an acyclic chain
/// scoped to one search run.
#[derive(Clone)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub g: usize,
    pub(crate) cost: usize,
    pub(crate) parent: Option<Rc<Cell>>,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Cell {
            x,
            y,
            g: 0,
            cost: 0,
            parent: None,
        }
    }

    /// Candidate successor one move away, arriving one time step later.
    /// Total cost and the back-link are filled in by the solver.
    pub fn step_to(&self, x: usize, y: usize) -> Cell {
        Cell {
            x,
            y,
            g: self.g + 1,
            cost: 0,
            parent: None,
        }
    }

    pub fn position(&self) -> Position {
        (self.x, self.y)
    }

    /// Manhattan distance; admissible and consistent for unit-cost
    /// 4-connected movement.
    pub fn heuristic(&self, target: &Cell) -> usize {
        self.x.abs_diff(target.x) + self.y.abs_diff(target.y)
    }

    /// Coordinate equality only; the accumulated cost is irrelevant here.
    pub fn is_goal(&self, goal: &Cell) -> bool {
        self.x == goal.x && self.y == goal.y
    }

    pub fn total_cost(&self) -> usize {
        self.cost
    }
}

// Node identity includes the accumulated cost: two arrivals on the same
// coordinates with different g are distinct entries for visited tracking.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.g == other.g
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x, self.y, self.g).hash(state);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] g={} f={}", self.x, self.y, self.g, self.cost)
    }
}

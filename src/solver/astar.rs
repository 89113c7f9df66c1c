use crate::cell::Cell;
use crate::common::{ConstraintSet, Path, Position};
use crate::map::Map;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Closed-list key: node identity is the pair of coordinates and
/// accumulated cost, so a cheaper and a dearer arrival on the same tile are
/// tracked as different nodes.
type CellKey = (Position, usize);

fn key(cell: &Cell) -> CellKey {
    (cell.position(), cell.g)
}

// Open list wrapper; the heap is a max-heap, so the comparison is inverted
// to pop the lowest total cost first. Deeper nodes win ties.
struct OpenEntry(Rc<Cell>);

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .total_cost()
            .cmp(&self.0.total_cost())
            .then_with(|| self.0.g.cmp(&other.0.g))
            .then_with(|| other.0.position().cmp(&self.0.position()))
    }
}

/// Single-agent constrained shortest-path search. The struct only holds
/// scratch space so one instance can serve every low-level query of a CBS
/// run; both structures are cleared at the start of each call and nothing
/// else survives between calls.
#[derive(Default)]
pub struct AStar {
    open: BinaryHeap<OpenEntry>,
    closed: HashMap<CellKey, Rc<Cell>>,
}

impl AStar {
    pub fn new() -> Self {
        AStar::default()
    }

    /// Least-cost path from `start` to `goal` under the given space-time
    /// constraints, or `None` when the frontier empties first. An exhausted
    /// frontier is an ordinary outcome, consumed upstream as an infeasible
    /// joint cost.
    #[instrument(skip_all, name = "a_star", fields(start = ?start.position(), goal = ?goal.position()), level = "debug")]
    pub fn search<M: Map>(
        &mut self,
        map: &M,
        start: &Cell,
        goal: &Cell,
        constraints: &ConstraintSet,
        stats: &mut Stats,
    ) -> Option<(usize, Path)> {
        self.open.clear();
        self.closed.clear();

        let mut root = Cell::new(start.x, start.y);
        root.cost = root.heuristic(goal);
        let root = Rc::new(root);
        self.closed.insert(key(&root), Rc::clone(&root));
        self.open.push(OpenEntry(root));

        while let Some(OpenEntry(current)) = self.open.pop() {
            trace!("expand node: {current:?}");
            stats.low_level_expanded_nodes += 1;

            // Goal test happens at pop time so the first goal node taken
            // off the frontier is known to be optimal.
            if current.is_goal(goal) {
                return Some((current.g, reconstruct_path(&current)));
            }

            for mut child in map.successors(&current, constraints) {
                child.cost = child.g + child.heuristic(goal);
                child.parent = Some(Rc::clone(&current));
                let child = Rc::new(child);
                let child_key = key(&child);

                match self.closed.get(&child_key) {
                    None => {
                        self.closed.insert(child_key, Rc::clone(&child));
                        self.open.push(OpenEntry(child));
                    }
                    // A strictly cheaper arrival at a known node replaces it
                    // and goes back on the frontier. The g-carrying key makes
                    // this branch vacuous in practice; it stays because the
                    // closed list is defined around that identity policy.
                    Some(seen) if seen.g > child.g => {
                        self.closed.insert(child_key, Rc::clone(&child));
                        self.open.push(OpenEntry(child));
                    }
                    Some(_) => {}
                }
            }
        }

        debug!("open list exhausted, no path");
        None
    }
}

/// Walk the predecessor links back to the root, then reverse: the result is
/// start-to-goal ordered and a step's index is its time step.
fn reconstruct_path(goal: &Rc<Cell>) -> Path {
    let mut path = vec![goal.position()];
    let mut current = goal;
    while let Some(parent) = current.parent.as_ref() {
        path.push(parent.position());
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::GridMap;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn run(
        astar: &mut AStar,
        map: &GridMap,
        start: Position,
        goal: Position,
        constraints: &ConstraintSet,
    ) -> Option<(usize, Path)> {
        astar.search(
            map,
            &Cell::new(start.0, start.1),
            &Cell::new(goal.0, goal.1),
            constraints,
            &mut Stats::default(),
        )
    }

    #[test]
    fn test_open_grid_cost_is_manhattan_distance() {
        init_tracing();
        let map = GridMap::new(6, 5, &[]).unwrap();
        let mut astar = AStar::new();

        let (cost, path) = run(&mut astar, &map, (0, 0), (5, 3), &ConstraintSet::default()).unwrap();
        assert_eq!(cost, 8);
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], (0, 0));
        assert_eq!(*path.last().unwrap(), (5, 3));
    }

    #[test]
    fn test_open_grid_admissibility_random_sweep() {
        init_tracing();
        let map = GridMap::new(8, 8, &[]).unwrap();
        let mut astar = AStar::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let start = (rng.gen_range(0..8), rng.gen_range(0..8));
            let goal = (rng.gen_range(0..8), rng.gen_range(0..8));
            let (cost, path) =
                run(&mut astar, &map, start, goal, &ConstraintSet::default()).unwrap();

            let manhattan = start.0.abs_diff(goal.0) + start.1.abs_diff(goal.1);
            assert_eq!(cost, manhattan);
            assert_eq!(path.len(), cost + 1);
        }
    }

    #[test]
    fn test_path_routes_around_obstacles() {
        init_tracing();
        let map = GridMap::from_ascii(&[
            ".....", //
            ".@@@.", //
            "..@..", //
        ])
        .unwrap();
        let mut astar = AStar::new();

        let (cost, path) = run(&mut astar, &map, (0, 2), (4, 2), &ConstraintSet::default()).unwrap();
        assert_eq!(cost, 8);
        for &(x, y) in &path {
            assert!(map.is_passable(x, y));
        }
    }

    #[test]
    fn test_constraint_forces_wait() {
        init_tracing();
        let map = GridMap::from_ascii(&["...."]).unwrap();
        let mut astar = AStar::new();

        // On a corridor the only escape from a timed forbiddance is waiting.
        let mut constraints = ConstraintSet::default();
        constraints.forbid((1, 0), 1);

        let (cost, path) = run(&mut astar, &map, (0, 0), (3, 0), &constraints).unwrap();
        assert_eq!(cost, 4);
        assert_eq!(path, vec![(0, 0), (0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_constraint_forces_detour() {
        init_tracing();
        let map = GridMap::from_ascii(&[
            "...", //
            "...", //
        ])
        .unwrap();
        let mut astar = AStar::new();

        // Both length-2 routes to the goal cross a forbidden arrival, and
        // waiting once clears every constraint.
        let mut constraints = ConstraintSet::default();
        constraints.forbid((1, 0), 1);
        constraints.forbid((0, 1), 1);

        let (cost, path) = run(&mut astar, &map, (0, 0), (1, 1), &constraints).unwrap();
        assert_eq!(cost, 3);
        assert_eq!(path[0], (0, 0));
        assert_eq!(*path.last().unwrap(), (1, 1));
    }

    #[test]
    fn test_unreachable_goal_reports_failure() {
        init_tracing();
        let map = GridMap::from_ascii(&[
            "..@.", //
            "..@.", //
        ])
        .unwrap();
        let mut astar = AStar::new();

        assert!(run(&mut astar, &map, (0, 0), (3, 1), &ConstraintSet::default()).is_none());
    }

    #[test]
    fn test_repeated_searches_reuse_scratch() {
        init_tracing();
        let map = GridMap::from_ascii(&[
            ".....", //
            ".@@@.", //
            ".....", //
        ])
        .unwrap();
        let mut astar = AStar::new();

        let first = run(&mut astar, &map, (0, 1), (4, 1), &ConstraintSet::default()).unwrap();
        let second = run(&mut astar, &map, (0, 1), (4, 1), &ConstraintSet::default()).unwrap();
        assert_eq!(first, second);

        // An unrelated failing query in between must not poison the next one.
        assert!(run(&mut astar, &map, (0, 0), (1, 1), &ConstraintSet::default()).is_none());
        let third = run(&mut astar, &map, (0, 1), (4, 1), &ConstraintSet::default()).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn test_start_equals_goal() {
        init_tracing();
        let map = GridMap::new(3, 3, &[]).unwrap();
        let mut astar = AStar::new();

        let (cost, path) = run(&mut astar, &map, (1, 1), (1, 1), &ConstraintSet::default()).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(path, vec![(1, 1)]);
    }
}

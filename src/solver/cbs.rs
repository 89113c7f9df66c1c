use super::astar::AStar;
use super::highlevel::{CbsState, INFEASIBLE};
use crate::common::{Agent, Solution};
use crate::map::Map;
use crate::stat::Stats;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::debug;

/// Conflict-Based Search: best-first search over constraint-tree nodes
/// ordered by aggregate cost. Child costs never drop below their parent's,
/// so the first conflict-free node popped is an optimal joint solution.
pub struct CBS<'a, M: Map> {
    map: &'a M,
    agents: Vec<Agent>,
    astar: AStar,
    stats: Stats,
}

impl<'a, M: Map> CBS<'a, M> {
    pub fn new(agents: Vec<Agent>, map: &'a M) -> Self {
        CBS {
            map,
            agents,
            astar: AStar::new(),
            stats: Stats::default(),
        }
    }

    pub fn solve(&mut self) -> Option<Solution> {
        let total_solve_start_time = Instant::now();

        let mut root = CbsState::new(self.map, self.agents.clone());
        if root.compute_cost(&mut self.astar, &mut self.stats) == INFEASIBLE {
            debug!("root node infeasible, no search attempted");
            return None;
        }

        let mut open = BinaryHeap::new();
        open.push(Reverse(root));

        while let Some(Reverse(current)) = open.pop() {
            match current.successors() {
                // Conflict-free node: its cached paths are the answer.
                None => {
                    self.stats.cost = current.cost();
                    self.stats.time_us = total_solve_start_time.elapsed().as_micros() as usize;
                    self.stats.print();

                    return Some(Solution {
                        paths: current.paths().to_vec(),
                        cost: current.cost(),
                    });
                }
                Some((child_1, child_2)) => {
                    for mut child in [child_1, child_2] {
                        // Infeasible children are dropped silently; a
                        // feasible child joins the frontier with its freshly
                        // computed cost.
                        if child.compute_cost(&mut self.astar, &mut self.stats) < INFEASIBLE {
                            self.stats.high_level_expanded_nodes += 1;
                            open.push(Reverse(child));
                        }
                    }
                }
            }
        }

        debug!("constraint tree exhausted without a solution");
        None
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

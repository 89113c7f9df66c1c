use super::astar::AStar;
use crate::cell::Cell;
use crate::common::{Agent, ConstraintSet, Path, Position};
use crate::map::Map;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Joint cost of a constraint-tree node none of whose agents can reach its
/// goal; such nodes are never enqueued.
pub const INFEASIBLE: usize = usize::MAX;

/// Two agents on the same position at the same time step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub agent_1: usize,
    pub agent_2: usize,
    pub position: Position,
    pub time_step: usize,
}

/// A constraint-tree node: one candidate joint solution. Owns one path and
/// one constraint set per agent plus the aggregate cost; siblings never
/// share mutable state, so a branch can only grow its own constraints.
pub struct CbsState<'a, M: Map> {
    map: &'a M,
    agents: Vec<Agent>,
    constraints: Vec<ConstraintSet>,
    paths: Vec<Path>,
    cost: usize,
}

impl<'a, M: Map> CbsState<'a, M> {
    /// Fresh, unevaluated node without constraints. `compute_cost` turns it
    /// into a costed node.
    pub fn new(map: &'a M, agents: Vec<Agent>) -> Self {
        let k = agents.len();
        CbsState {
            map,
            agents,
            constraints: vec![ConstraintSet::default(); k],
            paths: Vec::new(),
            cost: 0,
        }
    }

    /// Re-plans every agent under its private constraint set and caches the
    /// paths. Any single unreachable goal makes the whole node infeasible
    /// and drops the cached paths.
    pub fn compute_cost(&mut self, astar: &mut AStar, stats: &mut Stats) -> usize {
        let mut total_cost = 0;
        let mut paths = Vec::with_capacity(self.agents.len());

        for (agent, constraints) in self.agents.iter().zip(&self.constraints) {
            let start = Cell::new(agent.start.0, agent.start.1);
            let goal = Cell::new(agent.goal.0, agent.goal.1);

            match astar.search(self.map, &start, &goal, constraints, stats) {
                Some((path_cost, path)) => {
                    total_cost += path_cost;
                    paths.push(path);
                }
                None => {
                    debug!("agent {} has no path, node infeasible", agent.id);
                    self.cost = INFEASIBLE;
                    self.paths.clear();
                    return self.cost;
                }
            }
        }

        self.cost = total_cost;
        self.paths = paths;
        self.cost
    }

    /// First (position, time) pair occupied by two agents, scanning all
    /// cached paths in lock-step by time index. An agent whose path already
    /// ended is absent from later steps and blocks nothing. `None` means
    /// the node is a valid solution.
    pub fn first_conflict(&self) -> Option<Conflict> {
        let max_steps = self.paths.iter().map(Vec::len).max().unwrap_or(0);
        let mut occupied: HashMap<Position, usize> = HashMap::new();

        for time_step in 0..max_steps {
            occupied.clear();
            for (agent, path) in self.paths.iter().enumerate() {
                if let Some(&position) = path.get(time_step) {
                    if let Some(&earlier) = occupied.get(&position) {
                        return Some(Conflict {
                            agent_1: earlier,
                            agent_2: agent,
                            position,
                            time_step,
                        });
                    }
                    occupied.insert(position, agent);
                }
            }
        }

        None
    }

    /// Branches on the first conflict: each child is an independent value
    /// copy of this node carrying exactly one extra forbiddance, one per
    /// conflicting agent. Children are left unevaluated. Solution nodes
    /// have no children.
    pub fn successors(&self) -> Option<(Self, Self)> {
        let conflict = self.first_conflict()?;
        debug!("branching on {conflict:?}");

        let mut child_1 = self.branch();
        child_1.set_constraint(conflict.position, conflict.time_step, conflict.agent_1);

        let mut child_2 = self.branch();
        child_2.set_constraint(conflict.position, conflict.time_step, conflict.agent_2);

        Some((child_1, child_2))
    }

    pub fn set_constraint(&mut self, position: Position, time_step: usize, agent: usize) {
        self.constraints[agent].forbid(position, time_step);
    }

    pub fn cost(&self) -> usize {
        self.cost
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    fn branch(&self) -> Self {
        CbsState {
            map: self.map,
            agents: self.agents.clone(),
            constraints: self.constraints.clone(),
            paths: Vec::new(),
            cost: 0,
        }
    }

    fn constraint_count(&self) -> usize {
        self.constraints.iter().map(ConstraintSet::len).sum()
    }
}

impl<M: Map> Ord for CbsState<'_, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            // Fewer constraints first among equal costs; shallower nodes
            // tend to keep more routing freedom.
            .then_with(|| self.constraint_count().cmp(&other.constraint_count()))
    }
}

impl<M: Map> PartialOrd for CbsState<'_, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Map> PartialEq for CbsState<'_, M> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<M: Map> Eq for CbsState<'_, M> {}

impl<M: Map> fmt::Debug for CbsState<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CbsState")
            .field("agents", &self.agents)
            .field("constraints", &self.constraints)
            .field("paths", &self.paths)
            .field("cost", &self.cost)
            .finish()
    }
}

use std::collections::{HashMap, HashSet};

pub type Position = (usize, usize);

/// A start-to-goal sequence of positions; the index of a step is the
/// time step at which the agent occupies it.
pub type Path = Vec<Position>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: usize,
    pub start: Position,
    pub goal: Position,
}

/// Per-agent space-time forbiddances: a position maps to the set of time
/// steps at which arriving on it is prohibited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    forbidden: HashMap<Position, HashSet<usize>>,
}

impl ConstraintSet {
    pub fn forbid(&mut self, position: Position, time_step: usize) {
        self.forbidden.entry(position).or_default().insert(time_step);
    }

    pub fn is_forbidden(&self, position: Position, time_step: usize) -> bool {
        self.forbidden
            .get(&position)
            .is_some_and(|times| times.contains(&time_step))
    }

    /// Largest forbidden time step, 0 when the set is empty.
    pub fn latest_time_step(&self) -> usize {
        self.forbidden
            .values()
            .flat_map(|times| times.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.forbidden.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub paths: Vec<Path>,
    pub cost: usize,
}

impl Solution {
    /// Sanity check used by the driver and tests: every path connects its
    /// agent's start to its goal with unit or wait moves, the reported cost
    /// matches the paths, and no two agents share a position at the same
    /// time step. Agents that already finished do not occupy anything.
    pub fn verify(&self, agents: &[Agent]) -> bool {
        if self.paths.len() != agents.len() {
            return false;
        }

        let mut total = 0;
        for (agent, path) in agents.iter().zip(&self.paths) {
            let (Some(first), Some(last)) = (path.first(), path.last()) else {
                return false;
            };
            if *first != agent.start || *last != agent.goal {
                return false;
            }
            for window in path.windows(2) {
                let ((x1, y1), (x2, y2)) = (window[0], window[1]);
                if x1.abs_diff(x2) + y1.abs_diff(y2) > 1 {
                    return false;
                }
            }
            total += path.len() - 1;
        }
        if total != self.cost {
            return false;
        }

        let max_steps = self.paths.iter().map(Vec::len).max().unwrap_or(0);
        for time in 0..max_steps {
            let mut occupied = HashSet::new();
            for path in &self.paths {
                if let Some(&position) = path.get(time) {
                    if !occupied.insert(position) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_set_forbid_and_query() {
        let mut constraints = ConstraintSet::default();
        assert!(constraints.is_empty());
        assert_eq!(constraints.latest_time_step(), 0);

        constraints.forbid((1, 2), 3);
        constraints.forbid((1, 2), 5);
        constraints.forbid((0, 0), 1);

        assert!(constraints.is_forbidden((1, 2), 3));
        assert!(constraints.is_forbidden((1, 2), 5));
        assert!(!constraints.is_forbidden((1, 2), 4));
        assert!(!constraints.is_forbidden((2, 1), 3));
        assert_eq!(constraints.len(), 3);
        assert_eq!(constraints.latest_time_step(), 5);
    }

    #[test]
    fn test_solution_verify_accepts_disjoint_paths() {
        let agents = vec![
            Agent {
                id: 0,
                start: (0, 0),
                goal: (2, 0),
            },
            Agent {
                id: 1,
                start: (0, 1),
                goal: (2, 1),
            },
        ];
        let solution = Solution {
            paths: vec![
                vec![(0, 0), (1, 0), (2, 0)],
                vec![(0, 1), (1, 1), (2, 1)],
            ],
            cost: 4,
        };
        assert!(solution.verify(&agents));
    }

    #[test]
    fn test_solution_verify_rejects_shared_cell() {
        let agents = vec![
            Agent {
                id: 0,
                start: (0, 0),
                goal: (2, 0),
            },
            Agent {
                id: 1,
                start: (2, 0),
                goal: (0, 0),
            },
        ];
        // Head-on swap: both agents stand on (1, 0) at time 1.
        let solution = Solution {
            paths: vec![
                vec![(0, 0), (1, 0), (2, 0)],
                vec![(2, 0), (1, 0), (0, 0)],
            ],
            cost: 4,
        };
        assert!(!solution.verify(&agents));
    }

    #[test]
    fn test_solution_verify_rejects_teleport() {
        let agents = vec![Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        }];
        let solution = Solution {
            paths: vec![vec![(0, 0), (2, 2)]],
            cost: 1,
        };
        assert!(!solution.verify(&agents));
    }
}

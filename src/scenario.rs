use crate::common::{Agent, Position};
use crate::map::GridMap;

use anyhow::{anyhow, Result};
use rand::prelude::*;
use tracing::info;

/// Seeded random problem generation for the demo binary and benchmarks:
/// an obstacle map plus agents placed on distinct free tiles.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub width: usize,
    pub height: usize,
    pub obstacle_density: f64,
}

impl Scenario {
    pub fn generate_map<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GridMap> {
        let mut obstacles = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if rng.gen_bool(self.obstacle_density) {
                    obstacles.push((x, y));
                }
            }
        }
        GridMap::new(self.width, self.height, &obstacles)
    }

    /// Draws pairwise-distinct starts and pairwise-distinct goals from the
    /// map's free tiles. Reachability is not checked here; an impossible
    /// instance simply makes the solver report failure.
    pub fn generate_agents<R: Rng + ?Sized>(
        &self,
        map: &GridMap,
        num_agents: usize,
        rng: &mut R,
    ) -> Result<Vec<Agent>> {
        let mut free_tiles: Vec<Position> = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if map.is_passable(x, y) {
                    free_tiles.push((x, y));
                }
            }
        }

        if free_tiles.len() < num_agents {
            return Err(anyhow!(
                "not enough free tiles for {} agents, map has {}",
                num_agents,
                free_tiles.len()
            ));
        }

        let mut starts = free_tiles.clone();
        starts.shuffle(rng);
        let mut goals = free_tiles;
        goals.shuffle(rng);

        let agents: Vec<Agent> = starts
            .into_iter()
            .zip(goals)
            .take(num_agents)
            .enumerate()
            .map(|(id, (start, goal))| Agent { id, start, goal })
            .collect();

        info!("Generated scenario: {agents:?}");
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    use std::collections::HashSet;

    #[test]
    fn test_generated_agents_sit_on_distinct_free_tiles() {
        let scenario = Scenario {
            width: 8,
            height: 8,
            obstacle_density: 0.25,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let map = scenario.generate_map(&mut rng).unwrap();
        let agents = scenario.generate_agents(&map, 5, &mut rng).unwrap();

        assert_eq!(agents.len(), 5);
        let starts: HashSet<_> = agents.iter().map(|agent| agent.start).collect();
        let goals: HashSet<_> = agents.iter().map(|agent| agent.goal).collect();
        assert_eq!(starts.len(), 5);
        assert_eq!(goals.len(), 5);

        for agent in &agents {
            assert!(map.is_passable(agent.start.0, agent.start.1));
            assert!(map.is_passable(agent.goal.0, agent.goal.1));
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let scenario = Scenario {
            width: 6,
            height: 6,
            obstacle_density: 0.1,
        };

        let mut rng_a = StdRng::seed_from_u64(7);
        let map_a = scenario.generate_map(&mut rng_a).unwrap();
        let agents_a = scenario.generate_agents(&map_a, 3, &mut rng_a).unwrap();

        let mut rng_b = StdRng::seed_from_u64(7);
        let map_b = scenario.generate_map(&mut rng_b).unwrap();
        let agents_b = scenario.generate_agents(&map_b, 3, &mut rng_b).unwrap();

        assert_eq!(agents_a, agents_b);
    }

    #[test]
    fn test_crowded_map_is_rejected() {
        let scenario = Scenario {
            width: 2,
            height: 1,
            obstacle_density: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let map = scenario.generate_map(&mut rng).unwrap();

        assert!(scenario.generate_agents(&map, 3, &mut rng).is_err());
    }
}

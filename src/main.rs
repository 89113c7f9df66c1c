use mapf_cbs::config::{Cli, Config};
use mapf_cbs::scenario::Scenario;
use mapf_cbs::solver::CBS;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, Level};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli);
    config.validate()?;

    let scenario = Scenario {
        width: config.width,
        height: config.height,
        obstacle_density: config.obstacle_density,
    };
    let mut rng = StdRng::seed_from_u64(config.seed);
    let map = scenario.generate_map(&mut rng)?;
    let agents = scenario.generate_agents(&map, config.num_agents, &mut rng)?;

    let mut solver = CBS::new(agents.clone(), &map);
    if let Some(solution) = solver.solve() {
        assert!(solution.verify(&agents));
        info!("solution cost {}", solution.cost);
        for (agent, path) in agents.iter().zip(&solution.paths) {
            info!("agent {} path: {:?}", agent.id, path);
        }
    } else {
        error!("no conflict-free solution for this scenario");
    }

    Ok(())
}

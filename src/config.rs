use anyhow::anyhow;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "mapf_cbs",
    about = "Conflict-Based Search MAPF solver on randomly generated grids.",
    version = "0.1.0"
)]
pub struct Cli {
    #[arg(long, help = "Map width in tiles", default_value_t = 16)]
    pub width: usize,

    #[arg(long, help = "Map height in tiles", default_value_t = 16)]
    pub height: usize,

    #[arg(
        long,
        help = "Fraction of tiles blocked by obstacles",
        default_value_t = 0.2
    )]
    pub obstacle_density: f64,

    #[arg(long, help = "Number of agents", default_value_t = 4)]
    pub num_agents: usize,

    #[arg(
        long,
        help = "Seed for the random number generator",
        default_value_t = 0
    )]
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub obstacle_density: f64,
    pub num_agents: usize,
    pub seed: u64,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            obstacle_density: cli.obstacle_density,
            num_agents: cli.num_agents,
            seed: cli.seed,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "map dimensions must be non-zero, got {}x{}",
                self.width,
                self.height
            ));
        }

        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(anyhow!(
                "obstacle density must be in [0, 1), got {}",
                self.obstacle_density
            ));
        }

        if self.num_agents == 0 {
            return Err(anyhow!("at least one agent is required"));
        }

        let free_estimate =
            ((self.width * self.height) as f64 * (1.0 - self.obstacle_density)) as usize;
        if self.num_agents > free_estimate {
            return Err(anyhow!(
                "{} agents cannot fit on roughly {} free tiles",
                self.num_agents,
                free_estimate
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            width: 8,
            height: 8,
            obstacle_density: 0.2,
            num_agents: 4,
            seed: 0,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_density() {
        let mut config = base_config();
        config.obstacle_density = 1.0;
        assert!(config.validate().is_err());

        config.obstacle_density = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overcrowded_map() {
        let mut config = base_config();
        config.width = 2;
        config.height = 2;
        config.num_agents = 5;
        assert!(config.validate().is_err());
    }
}

use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cost: usize,
    pub time_us: usize,
    pub low_level_expanded_nodes: usize,
    pub high_level_expanded_nodes: usize,
}

impl Stats {
    pub(crate) fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} High level expand nodes number: {:?} Low level expand nodes number {:?}",
            self.cost, self.time_us, self.high_level_expanded_nodes, self.low_level_expanded_nodes
        );
    }
}

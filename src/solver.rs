mod astar;
mod cbs;
mod highlevel;

pub use astar::AStar;
pub use cbs::CBS;
pub use highlevel::{CbsState, Conflict, INFEASIBLE};

//! Optimal multi-agent pathfinding on 4-connected grids via Conflict-Based
//! Search: a best-first search over constraint-tree nodes whose costs come
//! from a constrained single-agent A*.

pub mod cell;
pub mod common;
pub mod config;
pub mod map;
pub mod scenario;
pub mod solver;
pub mod stat;

//! Route planning with A* search.
//!
//! Place references are resolved to road-graph nodes, the shortest node
//! path between them is found with A* over an indexed min-heap, and the
//! path is turned into the pose sequence a vehicle drives through.

mod astar;
mod config;
mod queue;
mod route;

pub use astar::{Path, find_path};
pub use config::{Heuristic, SearchConfig, UnknownHeuristic};
pub use queue::{HeapEntry, IndexedMinHeap};
pub use route::{Route, RoutePlanner};

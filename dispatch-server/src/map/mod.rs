//! Road-network model.
//!
//! The map is loaded once at startup into a [`RoadGraph`] and shared
//! read-only for the life of the process.

mod error;
mod graph;
mod loader;
mod types;

pub use error::MapLoadError;
pub use graph::{Direction, EdgeIter, RoadGraph};
pub use loader::{load_map, parse_map};
pub use types::{Edge, Node, NodeId, PlaceId, PlaceRef, Pose};

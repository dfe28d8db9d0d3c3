//! Trip planning: place resolution, search and pose conversion.

use std::sync::Arc;

use tracing::debug;

use crate::map::{NodeId, PlaceRef, Pose, RoadGraph};

use super::astar::find_path;
use super::config::SearchConfig;

/// A planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Node ids from start to destination.
    pub nodes: Vec<NodeId>,
    /// Coordinates to drive through, one per node that has them.
    pub poses: Vec<Pose>,
    /// Total edge length.
    pub length: f64,
}

/// Plans routes over a shared, read-only road graph.
///
/// Holds no per-search state, so one planner can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    graph: Arc<RoadGraph>,
    config: SearchConfig,
}

impl RoutePlanner {
    pub fn new(graph: Arc<RoadGraph>, config: SearchConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve a place reference to a graph node.
    ///
    /// A place name is looked up in the map's place index first; failing
    /// that, a name equal to a node id resolves to that node. A coordinate
    /// resolves to the nearest node.
    pub fn resolve(&self, place: &PlaceRef) -> Option<NodeId> {
        match place {
            PlaceRef::Place(name) => self.graph.place(name).cloned().or_else(|| {
                let as_node = NodeId::new(name.as_str());
                self.graph.node_by_id(&as_node).map(|_| as_node)
            }),
            PlaceRef::Coordinate(pose) => self.graph.nearest_node(pose).map(|n| n.id.clone()),
        }
    }

    /// Minimum-length node path from `start` to `goal`.
    pub fn search(&self, start: &NodeId, goal: &NodeId) -> Option<Vec<NodeId>> {
        find_path(&self.graph, start, goal, self.config.heuristic).map(|path| path.nodes)
    }

    /// Plan a route between two place references.
    ///
    /// `None` if either place is unresolvable or no path exists; the two are
    /// deliberately indistinguishable here. Use [`resolve`](Self::resolve)
    /// to tell them apart.
    pub fn plan_detailed(&self, start: &PlaceRef, destination: &PlaceRef) -> Option<Route> {
        let Some(start_id) = self.resolve(start) else {
            debug!(place = %start, "start place did not resolve");
            return None;
        };
        let Some(goal_id) = self.resolve(destination) else {
            debug!(place = %destination, "destination place did not resolve");
            return None;
        };

        let path = find_path(&self.graph, &start_id, &goal_id, self.config.heuristic)?;
        debug!(
            start = %start_id,
            goal = %goal_id,
            hops = path.nodes.len(),
            length = path.cost,
            expanded = path.expanded,
            "route found"
        );

        let poses = path
            .nodes
            .iter()
            .filter_map(|id| self.graph.node_by_id(id))
            .map(|node| node.pose())
            .collect();

        Some(Route {
            nodes: path.nodes,
            poses,
            length: path.cost,
        })
    }

    /// Plan a route and return just the poses to drive through.
    pub fn plan(&self, start: &PlaceRef, destination: &PlaceRef) -> Option<Vec<Pose>> {
        self.plan_detailed(start, destination)
            .map(|route| route.poses)
    }
}

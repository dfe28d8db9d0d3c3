//! A* search over the road graph.

use std::collections::HashMap;

use tracing::trace;

use crate::map::{Direction, NodeId, RoadGraph};

use super::config::Heuristic;
use super::queue::{HeapEntry, IndexedMinHeap};

/// A found path and its total edge length.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Node ids from start to goal, inclusive.
    pub nodes: Vec<NodeId>,
    /// Sum of edge lengths along `nodes`.
    pub cost: f64,
    /// Number of frontier pops before the goal was reached.
    pub expanded: usize,
}

/// Find a minimum-length path from `start` to `goal` following outgoing edges.
///
/// Returns `None` if either id is not a node of the graph or the goal is
/// unreachable. The frontier is ordered by `g + h`. A node already expanded
/// is queued again if a strictly shorter route to it turns up later.
pub fn find_path(
    graph: &RoadGraph,
    start: &NodeId,
    goal: &NodeId,
    heuristic: Heuristic,
) -> Option<Path> {
    let start_node = graph.node_by_id(start)?;
    let goal_pose = graph.node_by_id(goal)?.pose();

    let mut frontier = IndexedMinHeap::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

    g_score.insert(start.clone(), 0.0);
    frontier.push(
        start.clone(),
        heuristic.estimate(&start_node.pose(), &goal_pose),
    );

    let mut expanded = 0;
    while let Some(HeapEntry { key: current, .. }) = frontier.pop() {
        expanded += 1;
        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

        if &current == goal {
            let nodes = reconstruct(&came_from, start, current)?;
            trace!(expanded, cost = current_g, hops = nodes.len(), "A* reached goal");
            return Some(Path {
                nodes,
                cost: current_g,
                expanded,
            });
        }

        for edge in graph.edges_of(&current, Direction::Outgoing) {
            let Some(next) = graph.neighbor(&current, edge) else {
                continue;
            };

            let tentative = current_g + edge.length;
            let known = g_score.get(next).copied().unwrap_or(f64::INFINITY);
            if tentative < known {
                came_from.insert(next.clone(), current.clone());
                g_score.insert(next.clone(), tentative);

                // Endpoints added without coordinates get no estimate.
                let h = graph
                    .node_by_id(next)
                    .map_or(0.0, |n| heuristic.estimate(&n.pose(), &goal_pose));
                frontier.push(next.clone(), tentative + h);
            }
        }
    }

    trace!(expanded, "A* frontier exhausted");
    None
}

/// Walk predecessors back from `goal` to `start`.
fn reconstruct(
    came_from: &HashMap<NodeId, NodeId>,
    start: &NodeId,
    goal: NodeId,
) -> Option<Vec<NodeId>> {
    let mut path = vec![goal];
    while path.last() != Some(start) {
        let last = path.last()?;
        let prev = came_from.get(last)?;
        // A predecessor chain longer than the map means a cycle.
        if path.len() > came_from.len() {
            return None;
        }
        path.push(prev.clone());
    }
    path.reverse();
    Some(path)
}

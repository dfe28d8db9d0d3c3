//! In-memory road graph with adjacency and place indices.

use std::collections::HashMap;

use super::types::{Edge, Node, NodeId, PlaceId, Pose};

/// Which incident edges of a node to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges ending at the node.
    Incoming,
    /// Edges starting at the node.
    Outgoing,
    /// Both, in insertion order.
    All,
}

/// Edge slots incident to one node, indexing into `RoadGraph::edges`.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    incoming: Vec<usize>,
    outgoing: Vec<usize>,
    all: Vec<usize>,
}

impl Adjacency {
    fn slots(&self, direction: Direction) -> &[usize] {
        match direction {
            Direction::Incoming => &self.incoming,
            Direction::Outgoing => &self.outgoing,
            Direction::All => &self.all,
        }
    }

    fn push_outgoing(&mut self, slot: usize) {
        self.outgoing.push(slot);
        self.all.push(slot);
    }

    fn push_incoming(&mut self, slot: usize) {
        self.incoming.push(slot);
        self.all.push(slot);
    }
}

/// The road network.
///
/// Built once from a node list and an edge list. Node lookup and access to a
/// node's incident edges are both O(1). Every stored edge is listed under
/// its `from` node's outgoing edges and its `to` node's incoming edges,
/// for whichever of those nodes the graph knows about.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    /// Nodes in load order.
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    places: HashMap<PlaceId, NodeId>,
    edges: Vec<Edge>,
    adjacency: HashMap<NodeId, Adjacency>,
}

impl RoadGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from nodes and edges.
    ///
    /// A node repeating an earlier id replaces it. Edge endpoints that do not
    /// name a node are skipped: an unknown `from` drops the outgoing side, an
    /// unknown `to` drops the incoming side, and an edge with neither side
    /// known is not stored at all.
    pub fn build(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node);
        }
        for edge in edges {
            graph.attach(edge);
        }
        graph
    }

    fn insert_node(&mut self, node: Node) {
        self.adjacency.entry(node.id.clone()).or_default();
        if let Some(place) = &node.place_id {
            self.places.insert(place.clone(), node.id.clone());
        }

        match self.index.get(&node.id) {
            Some(&slot) => {
                let old = std::mem::replace(&mut self.nodes[slot], node);
                // Drop the replaced node's place unless the new node reuses it.
                if let Some(place) = old.place_id
                    && self.nodes[slot].place_id.as_ref() != Some(&place)
                    && self.places.get(&place) == Some(&old.id)
                {
                    self.places.remove(&place);
                }
            }
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    fn attach(&mut self, edge: Edge) {
        let slot = self.edges.len();
        let from_known = self.adjacency.contains_key(&edge.from);
        let to_known = self.adjacency.contains_key(&edge.to);

        if !from_known && !to_known {
            return;
        }
        if let Some(adj) = self.adjacency.get_mut(&edge.from) {
            adj.push_outgoing(slot);
        }
        if let Some(adj) = self.adjacency.get_mut(&edge.to) {
            adj.push_incoming(slot);
        }
        self.edges.push(edge);
    }

    /// Add an edge after the build, extending the map.
    ///
    /// Endpoints the graph has not seen get empty adjacency buckets, so the
    /// edge is always reachable from both sides. An edge with an empty
    /// endpoint id is rejected and `false` returned.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.from.is_empty() || edge.to.is_empty() {
            return false;
        }

        let slot = self.edges.len();
        self.adjacency
            .entry(edge.from.clone())
            .or_default()
            .push_outgoing(slot);
        self.adjacency
            .entry(edge.to.clone())
            .or_default()
            .push_incoming(slot);
        self.edges.push(edge);
        true
    }

    /// Look up a node by id.
    pub fn node_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Look up the node carrying a place name.
    pub fn place(&self, place: &PlaceId) -> Option<&NodeId> {
        self.places.get(place)
    }

    /// Edges incident to `id` in the given direction.
    ///
    /// Empty for an unknown node.
    pub fn edges_of(&self, id: &NodeId, direction: Direction) -> EdgeIter<'_> {
        let slots = self
            .adjacency
            .get(id)
            .map_or(&[][..], |adj| adj.slots(direction));
        EdgeIter {
            edges: &self.edges,
            slots: slots.iter(),
        }
    }

    /// The endpoint of `edge` that is not `id`.
    ///
    /// Returns `None` if `id` is not an endpoint of `edge`.
    pub fn neighbor<'e>(&self, id: &NodeId, edge: &'e Edge) -> Option<&'e NodeId> {
        edge.other_end(id)
    }

    /// The node closest to `pose` by planar distance.
    ///
    /// Ties go to the node loaded first. `None` on an empty graph.
    pub fn nearest_node(&self, pose: &Pose) -> Option<&Node> {
        let mut best: Option<(&Node, f64)> = None;
        for node in &self.nodes {
            let d = node.pose().planar_distance(pose);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((node, d));
            }
        }
        best.map(|(node, _)| node)
    }

    /// All nodes in load order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All stored edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }
}

/// Iterator over the edges incident to one node.
#[derive(Debug, Clone)]
pub struct EdgeIter<'a> {
    edges: &'a [Edge],
    slots: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for EdgeIter<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().map(|&slot| &self.edges[slot])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl ExactSizeIterator for EdgeIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn ids<'a>(edges: impl Iterator<Item = &'a Edge>) -> Vec<(String, String)> {
        edges
            .map(|e| (e.from.to_string(), e.to.to_string()))
            .collect()
    }

    fn triangle() -> RoadGraph {
        RoadGraph::build(
            vec![
                Node::new("a", 0.0, 0.0).with_place("home"),
                Node::new("b", 0.0, 1.0),
                Node::new("c", 1.0, 1.0).with_place("work"),
            ],
            vec![
                Edge::new("a", "b", 1.0),
                Edge::new("b", "c", 1.0),
                Edge::new("c", "a", 1.5),
            ],
        )
    }

    #[test]
    fn build_indexes_nodes_and_places() {
        let graph = triangle();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_by_id(&id("b")).map(|n| n.lng), Some(1.0));
        assert!(graph.node_by_id(&id("z")).is_none());
        assert_eq!(graph.place(&PlaceId::new("work")), Some(&id("c")));
        assert_eq!(graph.place(&PlaceId::new("gym")), None);
        assert_eq!(graph.place_count(), 2);

        let order: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(graph.edges().last(), Some(&Edge::new("c", "a", 1.5)));
    }

    #[test]
    fn edges_partitioned_by_direction() {
        let graph = triangle();

        assert_eq!(
            ids(graph.edges_of(&id("a"), Direction::Outgoing)),
            vec![("a".into(), "b".into())]
        );
        assert_eq!(
            ids(graph.edges_of(&id("a"), Direction::Incoming)),
            vec![("c".into(), "a".into())]
        );
        assert_eq!(
            ids(graph.edges_of(&id("a"), Direction::All)),
            vec![("a".into(), "b".into()), ("c".into(), "a".into())]
        );
    }

    #[test]
    fn edges_of_unknown_node_is_empty() {
        let graph = triangle();
        assert_eq!(graph.edges_of(&id("nope"), Direction::All).len(), 0);
    }

    #[test]
    fn build_skips_unknown_endpoints() {
        let graph = RoadGraph::build(
            vec![Node::new("a", 0.0, 0.0), Node::new("b", 0.0, 1.0)],
            vec![
                Edge::new("a", "ghost", 1.0),
                Edge::new("ghost", "b", 1.0),
                Edge::new("ghost", "phantom", 1.0),
            ],
        );

        // The fully dangling edge is not stored.
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges_of(&id("a"), Direction::Outgoing).len(), 1);
        assert_eq!(graph.edges_of(&id("a"), Direction::Incoming).len(), 0);
        assert_eq!(graph.edges_of(&id("b"), Direction::Incoming).len(), 1);
        assert_eq!(graph.edges_of(&id("ghost"), Direction::All).len(), 0);
    }

    #[test]
    fn duplicate_node_replaces_earlier() {
        let graph = RoadGraph::build(
            vec![
                Node::new("a", 0.0, 0.0).with_place("old"),
                Node::new("a", 5.0, 5.0),
            ],
            vec![],
        );

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node_by_id(&id("a")).map(|n| n.lat), Some(5.0));
        assert_eq!(graph.place(&PlaceId::new("old")), None);
    }

    #[test]
    fn neighbor_returns_other_endpoint() {
        let graph = triangle();
        let edge = Edge::new("a", "b", 1.0);

        assert_eq!(graph.neighbor(&id("a"), &edge), Some(&id("b")));
        assert_eq!(graph.neighbor(&id("b"), &edge), Some(&id("a")));
        assert_eq!(graph.neighbor(&id("c"), &edge), None);
    }

    #[test]
    fn add_edge_creates_buckets_for_new_endpoints() {
        let mut graph = triangle();

        assert!(graph.add_edge(Edge::new("c", "d", 2.0)));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edges_of(&id("c"), Direction::Outgoing).len(), 2);
        assert_eq!(
            ids(graph.edges_of(&id("d"), Direction::Incoming)),
            vec![("c".into(), "d".into())]
        );
        // The endpoint has adjacency but is still not a node.
        assert!(graph.node_by_id(&id("d")).is_none());
    }

    #[test]
    fn add_edge_rejects_missing_endpoint() {
        let mut graph = triangle();

        assert!(!graph.add_edge(Edge::new("", "a", 1.0)));
        assert!(!graph.add_edge(Edge::new("a", "", 1.0)));
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges_of(&id("a"), Direction::All).len(), 2);
    }

    #[test]
    fn nearest_node_prefers_first_on_tie() {
        let graph = triangle();

        let near_c = graph.nearest_node(&Pose::new(0.9, 1.2)).map(|n| n.id.clone());
        assert_eq!(near_c, Some(id("c")));

        // Equidistant from a and b.
        let tie = graph.nearest_node(&Pose::new(0.0, 0.5)).map(|n| n.id.clone());
        assert_eq!(tie, Some(id("a")));

        assert!(RoadGraph::new().nearest_node(&Pose::new(0.0, 0.0)).is_none());
    }
}

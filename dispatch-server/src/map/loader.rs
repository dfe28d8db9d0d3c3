//! Loading the road map from its JSON document.
//!
//! The document has a `nodes` array of `{id, lat, lng, placeId?}` and an
//! `edges` array of `{from, to, length}`. Content is validated before the
//! graph is built; anything malformed is an error rather than a partial map.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::error::MapLoadError;
use super::graph::RoadGraph;
use super::types::{Edge, Node, NodeId};

/// The on-disk map document.
#[derive(Debug, Deserialize)]
struct MapDocument {
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

/// Read and parse the map file at `path`.
pub fn load_map(path: impl AsRef<Path>) -> Result<RoadGraph, MapLoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = parse_map(&contents)?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        places = graph.place_count(),
        "loaded road map"
    );
    Ok(graph)
}

/// Parse and validate a map document.
pub fn parse_map(json: &str) -> Result<RoadGraph, MapLoadError> {
    let doc: MapDocument = serde_json::from_str(json)?;

    if doc.nodes.is_empty() {
        return Err(MapLoadError::Empty);
    }

    let mut seen: HashSet<&NodeId> = HashSet::with_capacity(doc.nodes.len());
    for node in &doc.nodes {
        if !node.lat.is_finite() || !node.lng.is_finite() {
            return Err(MapLoadError::InvalidCoordinate(node.id.clone()));
        }
        if !seen.insert(&node.id) {
            return Err(MapLoadError::DuplicateNode(node.id.clone()));
        }
    }

    let mut dangling = 0usize;
    for edge in &doc.edges {
        if !edge.length.is_finite() || edge.length < 0.0 {
            return Err(MapLoadError::InvalidLength {
                from: edge.from.clone(),
                to: edge.to.clone(),
                length: edge.length,
            });
        }
        if !seen.contains(&edge.from) || !seen.contains(&edge.to) {
            dangling += 1;
        }
    }
    if dangling > 0 {
        warn!(dangling, "map has edges referencing unknown nodes");
    }

    Ok(RoadGraph::build(doc.nodes, doc.edges))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::map::{Direction, PlaceId};

    const SAMPLE: &str = r#"{
        "nodes": [
            {"id": "n1", "lat": 10.0, "lng": 20.0, "placeId": "gate"},
            {"id": "n2", "lat": 10.0, "lng": 20.001},
            {"id": 3, "lat": 10.001, "lng": 20.001}
        ],
        "edges": [
            {"from": "n1", "to": "n2", "length": 0.001},
            {"from": "n2", "to": 3, "length": 0.001},
            {"from": "n2", "to": "ghost", "length": 0.5}
        ]
    }"#;

    #[test]
    fn parse_sample_map() {
        let graph = parse_map(SAMPLE).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.place(&PlaceId::new("gate")), Some(&NodeId::new("n1")));
        assert!(graph.node_by_id(&NodeId::new("3")).is_some());
        assert_eq!(
            graph
                .edges_of(&NodeId::new("n2"), Direction::Outgoing)
                .count(),
            2
        );
    }

    #[test]
    fn edges_default_to_empty() {
        let graph = parse_map(r#"{"nodes": [{"id": "a", "lat": 0, "lng": 0}]}"#).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn reject_missing_nodes_array() {
        let err = parse_map(r#"{"edges": []}"#).unwrap_err();
        assert!(matches!(err, MapLoadError::Json(_)));
    }

    #[test]
    fn reject_garbage() {
        assert!(matches!(
            parse_map("not json").unwrap_err(),
            MapLoadError::Json(_)
        ));
    }

    #[test]
    fn reject_empty_map() {
        let err = parse_map(r#"{"nodes": [], "edges": []}"#).unwrap_err();
        assert!(matches!(err, MapLoadError::Empty));
    }

    #[test]
    fn reject_duplicate_ids() {
        let err = parse_map(
            r#"{"nodes": [{"id": 1, "lat": 0, "lng": 0}, {"id": "1", "lat": 1, "lng": 1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MapLoadError::DuplicateNode(id) if id.as_str() == "1"));
    }

    #[test]
    fn reject_negative_length() {
        let err = parse_map(
            r#"{
                "nodes": [{"id": "a", "lat": 0, "lng": 0}, {"id": "b", "lat": 0, "lng": 1}],
                "edges": [{"from": "a", "to": "b", "length": -1}]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MapLoadError::InvalidLength { .. }));
    }

    #[test]
    fn bundled_map_is_valid() {
        let graph = parse_map(include_str!("../../config/hdmap.json")).unwrap();

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 14);
        assert_eq!(
            graph.place(&PlaceId::new("library")),
            Some(&NodeId::new("n3"))
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let graph = load_map(file.path()).unwrap();
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_map(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MapLoadError::Io { .. }));
    }
}

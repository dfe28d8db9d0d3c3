//! Identifier and record types for the road network.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a node in a [`RoadGraph`](super::RoadGraph).
///
/// Map files may write ids as JSON strings or integers. Integers are kept as
/// their decimal text, so `7` and `"7"` name the same node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id, which never names a node.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => NodeId(s),
            RawId::Number(n) => NodeId(n.to_string()),
        })
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Logical place name attached to a node (e.g. "library", "gate-3").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub lat: f64,
    pub lng: f64,
}

impl Pose {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar Euclidean distance in degree space.
    ///
    /// This treats lat/lng as flat coordinates, which is only meaningful
    /// over the small areas a single road map covers.
    pub fn planar_distance(&self, other: &Pose) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// A road-network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            place_id: None,
        }
    }

    /// Attach a logical place name to this node.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place_id = Some(PlaceId::new(place));
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.lat, self.lng)
    }
}

/// A directed road segment.
///
/// A two-way road is two edges with swapped endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub length: f64,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, length: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            length,
        }
    }

    /// The endpoint that is not `id`, or `None` if `id` is not an endpoint.
    ///
    /// A self-loop yields `id` itself.
    pub fn other_end(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.to == id {
            Some(&self.from)
        } else if &self.from == id {
            Some(&self.to)
        } else {
            None
        }
    }
}

/// Where a trip starts or ends, before resolution to a graph node.
///
/// On the wire this is either a place name string or a `{lat, lng}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceRef {
    Place(PlaceId),
    Coordinate(Pose),
}

impl PlaceRef {
    pub fn place(name: impl Into<String>) -> Self {
        PlaceRef::Place(PlaceId::new(name))
    }

    /// True for an empty place name.
    pub fn is_blank(&self) -> bool {
        matches!(self, PlaceRef::Place(p) if p.as_str().trim().is_empty())
    }
}

impl fmt::Display for PlaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceRef::Place(p) => write!(f, "{p}"),
            PlaceRef::Coordinate(pose) => write!(f, "{pose}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_accepts_strings_and_integers() {
        let from_text: NodeId = serde_json::from_str("\"n7\"").unwrap();
        let from_number: NodeId = serde_json::from_str("7").unwrap();

        assert_eq!(from_text.as_str(), "n7");
        assert_eq!(from_number, NodeId::new("7"));
    }

    #[test]
    fn node_id_rejects_other_json() {
        assert!(serde_json::from_str::<NodeId>("1.5").is_err());
        assert!(serde_json::from_str::<NodeId>("{}").is_err());
        assert!(serde_json::from_str::<NodeId>("null").is_err());
    }

    #[test]
    fn node_parses_optional_place() {
        let node: Node =
            serde_json::from_str(r#"{"id": 1, "lat": 1.5, "lng": 2.5, "placeId": "gate"}"#)
                .unwrap();
        assert_eq!(node.id.as_str(), "1");
        assert_eq!(node.place_id, Some(PlaceId::new("gate")));

        let bare: Node = serde_json::from_str(r#"{"id": "a", "lat": 0, "lng": 0}"#).unwrap();
        assert_eq!(bare.place_id, None);
    }

    #[test]
    fn other_end_of_edge() {
        let edge = Edge::new("a", "b", 1.0);

        assert_eq!(edge.other_end(&"a".into()), Some(&NodeId::new("b")));
        assert_eq!(edge.other_end(&"b".into()), Some(&NodeId::new("a")));
        assert_eq!(edge.other_end(&"c".into()), None);

        let looped = Edge::new("a", "a", 1.0);
        assert_eq!(looped.other_end(&"a".into()), Some(&NodeId::new("a")));
    }

    #[test]
    fn place_ref_wire_forms() {
        let named: PlaceRef = serde_json::from_str("\"library\"").unwrap();
        assert_eq!(named, PlaceRef::place("library"));

        let coord: PlaceRef = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#).unwrap();
        assert_eq!(coord, PlaceRef::Coordinate(Pose::new(1.0, 2.0)));

        assert!(PlaceRef::place("  ").is_blank());
        assert!(!coord.is_blank());
    }

    #[test]
    fn planar_distance_is_euclidean() {
        let a = Pose::new(0.0, 0.0);
        let b = Pose::new(3.0, 4.0);
        assert_eq!(a.planar_distance(&b), 5.0);
        assert_eq!(b.planar_distance(&a), 5.0);
    }
}

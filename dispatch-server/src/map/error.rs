//! Map loading errors.

use std::path::PathBuf;

use super::types::NodeId;

/// Errors that stop a map from loading.
///
/// Any of these is fatal at startup: the server never runs on a partial map.
#[derive(Debug, thiserror::Error)]
pub enum MapLoadError {
    /// Map file could not be read
    #[error("failed to read map file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Map document is not valid JSON of the expected shape
    #[error("malformed map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Map has no nodes
    #[error("map contains no nodes")]
    Empty,

    /// Two nodes share an id
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// Node coordinates are NaN or infinite
    #[error("node {0} has non-finite coordinates")]
    InvalidCoordinate(NodeId),

    /// Edge length is negative, NaN or infinite
    #[error("edge {from} -> {to} has invalid length {length}")]
    InvalidLength {
        from: NodeId,
        to: NodeId,
        length: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MapLoadError::Io {
            path: PathBuf::from("config/hdmap.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read map file config/hdmap.json: no such file"
        );

        let err = MapLoadError::DuplicateNode(NodeId::new("n1"));
        assert_eq!(err.to_string(), "duplicate node id n1");

        let err = MapLoadError::InvalidLength {
            from: NodeId::new("a"),
            to: NodeId::new("b"),
            length: -2.0,
        };
        assert_eq!(err.to_string(), "edge a -> b has invalid length -2");

        assert_eq!(MapLoadError::Empty.to_string(), "map contains no nodes");
    }
}

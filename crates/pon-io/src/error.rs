//! Error types for document import.

use std::error::Error;
use std::fmt;
use std::io;

use pon_topology::TopologyError;

/// Errors that can occur while reading a topology document.
#[derive(Debug)]
pub enum ImportError {
    /// The reader failed.
    Io(io::Error),
    /// The document is not valid JSON or does not have the expected shape.
    Json(serde_json::Error),
    /// A node's `type` tag is not one of the five known kinds.
    UnknownKind {
        /// The node carrying the tag.
        node: String,
        /// The unrecognized tag.
        kind: String,
    },
    /// The records do not form a topology (duplicate ids, dangling links).
    Topology(TopologyError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "invalid document: {e}"),
            Self::UnknownKind { node, kind } => {
                write!(f, "node '{node}' has unknown type '{kind}'")
            }
            Self::Topology(e) => write!(f, "invalid topology: {e}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Topology(e) => Some(e),
            Self::UnknownKind { .. } => None,
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports reader failures as its own error; keep them as I/O.
        if e.is_io() {
            return Self::Io(e.into());
        }
        Self::Json(e)
    }
}

impl From<TopologyError> for ImportError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_core::NodeId;

    #[test]
    fn topology_error_is_source() {
        let e = ImportError::from(TopologyError::DuplicateNode(NodeId::new("a")));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("'a'"));
    }

    #[test]
    fn syntax_error_is_json() {
        let e: ImportError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(e, ImportError::Json(_)));
    }

    #[test]
    fn unknown_kind_message() {
        let e = ImportError::UnknownKind {
            node: "x".into(),
            kind: "ROUTER".into(),
        };
        assert_eq!(e.to_string(), "node 'x' has unknown type 'ROUTER'");
    }
}

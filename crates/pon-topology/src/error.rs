//! Error types for topology construction and editing.

use pon_core::{LinkId, NodeId, PortName};
use std::fmt;

/// Errors raised when a structural edit would break a topology invariant.
///
/// These are operator-facing validation errors: they are returned before
/// the edit is applied, so the topology is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// A node with this id already exists.
    DuplicateNode(NodeId),
    /// A link with this id already exists.
    DuplicateLink(LinkId),
    /// The referenced node does not exist.
    UnknownNode(NodeId),
    /// The referenced link does not exist.
    UnknownLink(LinkId),
    /// A link references a node that does not exist.
    DanglingLink {
        /// The offending link.
        link: LinkId,
        /// The missing endpoint.
        node: NodeId,
    },
    /// A link would connect a node to itself.
    SelfLoop(NodeId),
    /// The target already has an incoming link.
    TargetAlreadyFed {
        /// The target node.
        target: NodeId,
        /// The link already feeding it.
        existing: LinkId,
    },
    /// The source port already feeds another link.
    PortInUse {
        /// The source node.
        source: NodeId,
        /// The contested port.
        port: PortName,
        /// The link already using it.
        existing: LinkId,
    },
    /// Sources have no input and cannot be link targets.
    SourceHasNoInput(NodeId),
    /// The source node's kind does not produce this port.
    UnknownPort {
        /// The source node.
        node: NodeId,
        /// The requested port.
        port: PortName,
    },
    /// A kind-specific edit was applied to a node of another kind.
    KindMismatch {
        /// The edited node.
        node: NodeId,
        /// The kind the edit applies to.
        expected: &'static str,
        /// The node's actual kind.
        found: &'static str,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode(id) => write!(f, "node '{id}' already exists"),
            Self::DuplicateLink(id) => write!(f, "link '{id}' already exists"),
            Self::UnknownNode(id) => write!(f, "node '{id}' not found"),
            Self::UnknownLink(id) => write!(f, "link '{id}' not found"),
            Self::DanglingLink { link, node } => {
                write!(f, "link '{link}' references missing node '{node}'")
            }
            Self::SelfLoop(id) => write!(f, "node '{id}' cannot be linked to itself"),
            Self::TargetAlreadyFed { target, existing } => {
                write!(
                    f,
                    "target node '{target}' already has an input connection (link '{existing}')"
                )
            }
            Self::PortInUse {
                source,
                port,
                existing,
            } => {
                write!(
                    f,
                    "source port '{port}' on node '{source}' is already connected (link '{existing}')"
                )
            }
            Self::SourceHasNoInput(id) => {
                write!(f, "node '{id}' is a source and cannot receive a link")
            }
            Self::UnknownPort { node, port } => {
                write!(f, "node '{node}' has no output port '{port}'")
            }
            Self::KindMismatch {
                node,
                expected,
                found,
            } => {
                write!(f, "node '{node}' is a {found}, not a {expected}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

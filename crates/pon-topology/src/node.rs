//! Network elements and their kind-specific parameters.

use indexmap::IndexMap;
use pon_core::{ComputedLevels, NodeId, PortName};

/// A network element and its kind-specific parameters.
///
/// Parameters are optional: an absent value is kept as `None` so that
/// the engine can substitute its configured default rather than the
/// model guessing one at construction time.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Optical line terminal. Emits `launch_power_dbm` on port `out`.
    Source {
        /// Launch power in dBm.
        launch_power_dbm: Option<f64>,
    },
    /// Splitter dividing power equally across `N` branches.
    SplitterBalanced {
        /// Ratio string, expected as `"1:N"`.
        ratio: Option<String>,
        /// Loss applied to every branch, in dB.
        insertion_loss_db: Option<f64>,
    },
    /// Asymmetric tap splitter with an independent loss per port.
    SplitterUnbalanced {
        /// Display ratio (e.g. `"5:95"`); carried for the editor only.
        ratio: Option<String>,
        /// Loss per output port, in dB. The keys are the node's ports.
        port_losses: IndexMap<PortName, f64>,
    },
    /// Inline attenuator (connector, splice, fixed pad).
    Attenuator {
        /// Loss in dB.
        attenuation_db: Option<f64>,
    },
    /// Optical network unit. Terminal, no outputs.
    Receiver,
}

impl NodeKind {
    /// A source with the given launch power.
    pub fn source(launch_power_dbm: f64) -> Self {
        Self::Source {
            launch_power_dbm: Some(launch_power_dbm),
        }
    }

    /// A balanced splitter with an explicit ratio and loss.
    pub fn balanced(ratio: impl Into<String>, insertion_loss_db: f64) -> Self {
        Self::SplitterBalanced {
            ratio: Some(ratio.into()),
            insertion_loss_db: Some(insertion_loss_db),
        }
    }

    /// An unbalanced splitter from `(port, loss)` pairs, in port order.
    pub fn unbalanced<P, I>(port_losses: I) -> Self
    where
        P: Into<PortName>,
        I: IntoIterator<Item = (P, f64)>,
    {
        Self::SplitterUnbalanced {
            ratio: None,
            port_losses: port_losses
                .into_iter()
                .map(|(p, loss)| (p.into(), loss))
                .collect(),
        }
    }

    /// An attenuator with the given loss.
    pub fn attenuator(attenuation_db: f64) -> Self {
        Self::Attenuator {
            attenuation_db: Some(attenuation_db),
        }
    }

    /// Lower-case kind name for messages and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source { .. } => "source",
            Self::SplitterBalanced { .. } => "balanced splitter",
            Self::SplitterUnbalanced { .. } => "unbalanced splitter",
            Self::Attenuator { .. } => "attenuator",
            Self::Receiver => "receiver",
        }
    }

    /// `true` for [`NodeKind::Source`].
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source { .. })
    }

    /// `true` for [`NodeKind::Receiver`].
    pub fn is_receiver(&self) -> bool {
        matches!(self, Self::Receiver)
    }
}

/// Canvas position, carried through untouched for the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// A network element as seen by the engine and the editor.
///
/// `levels` is written by every propagation run and means nothing
/// before the first one.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Unique id.
    pub id: NodeId,
    /// Display name.
    pub label: String,
    /// Free-text note.
    pub description: Option<String>,
    /// Canvas placement.
    pub position: Option<Position>,
    /// Kind and parameters.
    pub kind: NodeKind,
    /// Computed input and output levels.
    pub levels: ComputedLevels,
}

impl Node {
    /// A node labelled with its own id, unplaced and unreached.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            label: id.to_string(),
            id,
            description: None,
            position: None,
            kind,
            levels: ComputedLevels::unreached(),
        }
    }

    /// Set the display name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the canvas position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Copy of this node with its computed levels replaced.
    pub fn with_levels(&self, levels: ComputedLevels) -> Self {
        Self {
            levels,
            ..self.clone()
        }
    }

    /// `true` if everything except the computed levels matches `other`.
    pub fn same_definition(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.description == other.description
            && self.position == other.position
            && self.kind == other.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_core::InputLevel;

    #[test]
    fn new_node_is_unreached_and_self_labelled() {
        let n = Node::new("onu-1", NodeKind::Receiver);
        assert_eq!(n.label, "onu-1");
        assert_eq!(n.levels.input, InputLevel::NoSignal);
        assert!(n.levels.outputs.is_empty());
    }

    #[test]
    fn unbalanced_keeps_port_order() {
        let kind = NodeKind::unbalanced([("out-95", 0.5), ("out-5", 13.5)]);
        let NodeKind::SplitterUnbalanced { port_losses, .. } = kind else {
            panic!("expected unbalanced splitter");
        };
        let ports: Vec<&str> = port_losses.keys().map(PortName::as_str).collect();
        assert_eq!(ports, ["out-95", "out-5"]);
    }

    #[test]
    fn with_levels_keeps_definition() {
        let n = Node::new("olt", NodeKind::source(3.0)).at(10.0, 20.0);
        let mut levels = ComputedLevels::unreached();
        levels.input = InputLevel::NotApplicable;
        let m = n.with_levels(levels);
        assert!(n.same_definition(&m));
        assert_ne!(n, m);
    }

    #[test]
    fn kind_names() {
        assert_eq!(NodeKind::Receiver.name(), "receiver");
        assert_eq!(NodeKind::balanced("1:4", 7.0).name(), "balanced splitter");
        assert!(NodeKind::source(3.0).is_source());
    }
}

//! Standard component presets.
//!
//! Typical insertion losses for PLC and FBT splitters as sold, plus the
//! default source and connector. Each preset builds a ready [`Node`].

use pon_core::{NodeId, PortName};

use crate::node::{Node, NodeKind};

/// A `1:N` balanced splitter as catalogued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BalancedPreset {
    /// Output branch count.
    pub branches: u32,
    /// Insertion loss per branch, in dB.
    pub loss_db: f64,
}

impl BalancedPreset {
    /// Ratio string, e.g. `"1:8"`.
    pub fn ratio(&self) -> String {
        format!("1:{}", self.branches)
    }

    /// Palette label, e.g. `"Splitter 1:8"`.
    pub fn label(&self) -> String {
        format!("Splitter {}", self.ratio())
    }

    /// The node kind this preset describes.
    pub fn kind(&self) -> NodeKind {
        NodeKind::balanced(self.ratio(), self.loss_db)
    }

    /// A new node of this preset.
    pub fn node(&self, id: impl Into<NodeId>) -> Node {
        Node::new(id, self.kind()).with_label(self.label())
    }
}

/// An asymmetric tap splitter as catalogued.
///
/// The two ports are named after their share of the power: a 5/95 tap
/// has ports `out-5` and `out-95`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnbalancedPreset {
    /// Percentage of power on the tap port.
    pub tap_percent: u32,
    /// Percentage of power on the through port.
    pub through_percent: u32,
    /// Loss on the tap port, in dB.
    pub tap_loss_db: f64,
    /// Loss on the through port, in dB.
    pub through_loss_db: f64,
}

impl UnbalancedPreset {
    /// Tap port name, e.g. `out-5`.
    pub fn tap_port(&self) -> PortName {
        PortName::branch(self.tap_percent)
    }

    /// Through port name, e.g. `out-95`.
    pub fn through_port(&self) -> PortName {
        PortName::branch(self.through_percent)
    }

    /// Palette label, e.g. `"Splitter 5/95"`.
    pub fn label(&self) -> String {
        format!("Splitter {}/{}", self.tap_percent, self.through_percent)
    }

    /// The node kind this preset describes. Ratio reads `"5:95"`.
    pub fn kind(&self) -> NodeKind {
        let mut kind = NodeKind::unbalanced([
            (self.tap_port(), self.tap_loss_db),
            (self.through_port(), self.through_loss_db),
        ]);
        if let NodeKind::SplitterUnbalanced { ratio, .. } = &mut kind {
            *ratio = Some(format!("{}:{}", self.tap_percent, self.through_percent));
        }
        kind
    }

    /// A new node of this preset.
    pub fn node(&self, id: impl Into<NodeId>) -> Node {
        Node::new(id, self.kind()).with_label(self.label())
    }
}

const BALANCED: [BalancedPreset; 7] = [
    BalancedPreset { branches: 2, loss_db: 3.5 },
    BalancedPreset { branches: 4, loss_db: 7.0 },
    BalancedPreset { branches: 8, loss_db: 10.5 },
    BalancedPreset { branches: 16, loss_db: 14.0 },
    BalancedPreset { branches: 32, loss_db: 17.5 },
    BalancedPreset { branches: 64, loss_db: 21.0 },
    BalancedPreset { branches: 128, loss_db: 24.5 },
];

const fn tap(tap_percent: u32, tap_loss_db: f64, through_loss_db: f64) -> UnbalancedPreset {
    UnbalancedPreset {
        tap_percent,
        through_percent: 100 - tap_percent,
        tap_loss_db,
        through_loss_db,
    }
}

const UNBALANCED: [UnbalancedPreset; 12] = [
    tap(1, 20.0, 0.1),
    tap(2, 17.0, 0.2),
    tap(5, 13.5, 0.5),
    tap(10, 10.5, 0.6),
    tap(15, 8.5, 0.9),
    tap(20, 7.3, 1.2),
    tap(25, 6.3, 1.5),
    tap(30, 5.5, 1.8),
    tap(35, 4.8, 2.1),
    tap(40, 4.2, 2.4),
    tap(45, 3.7, 2.9),
    tap(50, 3.5, 3.5),
];

/// Standard balanced splitters, `1:2` through `1:128`.
pub fn balanced_presets() -> &'static [BalancedPreset] {
    &BALANCED
}

/// Standard tap splitters, `1/99` through `50/50`.
pub fn unbalanced_presets() -> &'static [UnbalancedPreset] {
    &UNBALANCED
}

/// The default optical line terminal: 3 dBm launch power.
pub fn olt(id: impl Into<NodeId>) -> Node {
    Node::new(id, NodeKind::source(3.0)).with_label("PON")
}

/// A connector or splice: 0.5 dB attenuator.
pub fn connector(id: impl Into<NodeId>) -> Node {
    Node::new(id, NodeKind::attenuator(0.5)).with_label("Connector")
}

/// A subscriber receiver.
pub fn onu(id: impl Into<NodeId>) -> Node {
    Node::new(id, NodeKind::Receiver).with_label("ONU Client")
}

//! Output port enumeration per node kind.

use pon_core::{PortName, DEFAULT_PORT, DEFAULT_SPLIT_COUNT};
use smallvec::{smallvec, SmallVec};

use crate::node::NodeKind;
use crate::ratio::branch_count;

/// Output ports of one node. Inline for the common 1- and 2-port kinds.
pub type PortList = SmallVec<[PortName; 4]>;

/// The ports a new link may be attached to, in display order.
///
/// Balanced splitters list `out-1 … out-N`; their legacy `out` alias is
/// still honoured by [`accepts_port`] but not offered for new links.
/// A malformed, absent or oversized ratio is read as `1:2`.
pub fn output_ports(kind: &NodeKind) -> PortList {
    match kind {
        NodeKind::Source { .. } | NodeKind::Attenuator { .. } => smallvec![PortName::out()],
        NodeKind::SplitterBalanced { ratio, .. } => {
            let n = branch_count(ratio.as_deref(), DEFAULT_SPLIT_COUNT);
            (1..=n).map(PortName::branch).collect()
        }
        NodeKind::SplitterUnbalanced { port_losses, .. } => port_losses.keys().cloned().collect(),
        NodeKind::Receiver => SmallVec::new(),
    }
}

/// The port preselected when linking from a node of this kind.
///
/// `None` for receivers and for unbalanced splitters with no ports.
pub fn default_port(kind: &NodeKind) -> Option<PortName> {
    match kind {
        NodeKind::SplitterBalanced { .. } => Some(PortName::branch(1)),
        NodeKind::SplitterUnbalanced { port_losses, .. } => port_losses.keys().next().cloned(),
        NodeKind::Source { .. } | NodeKind::Attenuator { .. } => Some(PortName::out()),
        NodeKind::Receiver => None,
    }
}

/// `true` if a node of this kind produces a level on `port`.
pub fn accepts_port(kind: &NodeKind, port: &str) -> bool {
    match kind {
        NodeKind::Source { .. } | NodeKind::Attenuator { .. } => port == DEFAULT_PORT,
        NodeKind::SplitterBalanced { ratio, .. } => {
            if port == DEFAULT_PORT {
                return true;
            }
            let n = branch_count(ratio.as_deref(), DEFAULT_SPLIT_COUNT);
            port.strip_prefix("out-")
                .and_then(|i| i.parse::<u32>().ok())
                .is_some_and(|i| i >= 1 && i <= n && port == PortName::branch(i).as_str())
        }
        NodeKind::SplitterUnbalanced { port_losses, .. } => port_losses.contains_key(port),
        NodeKind::Receiver => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ports: &PortList) -> Vec<&str> {
        ports.iter().map(PortName::as_str).collect()
    }

    #[test]
    fn single_port_kinds() {
        assert_eq!(names(&output_ports(&NodeKind::source(3.0))), ["out"]);
        assert_eq!(names(&output_ports(&NodeKind::attenuator(0.5))), ["out"]);
        assert!(output_ports(&NodeKind::Receiver).is_empty());
    }

    #[test]
    fn balanced_lists_branches() {
        let ports = output_ports(&NodeKind::balanced("1:4", 7.0));
        assert_eq!(names(&ports), ["out-1", "out-2", "out-3", "out-4"]);
    }

    #[test]
    fn balanced_without_ratio_has_two_branches() {
        let kind = NodeKind::SplitterBalanced {
            ratio: None,
            insertion_loss_db: None,
        };
        assert_eq!(names(&output_ports(&kind)), ["out-1", "out-2"]);
        let kind = NodeKind::balanced("one to eight", 10.5);
        assert_eq!(output_ports(&kind).len(), 2);
    }

    #[test]
    fn unbalanced_lists_map_keys() {
        let kind = NodeKind::unbalanced([("out-5", 13.5), ("out-95", 0.5)]);
        assert_eq!(names(&output_ports(&kind)), ["out-5", "out-95"]);
        assert_eq!(default_port(&kind), Some(PortName::new("out-5")));
    }

    #[test]
    fn default_ports() {
        assert_eq!(default_port(&NodeKind::balanced("1:8", 10.5)), Some(PortName::branch(1)));
        assert_eq!(default_port(&NodeKind::source(3.0)), Some(PortName::out()));
        assert_eq!(default_port(&NodeKind::Receiver), None);
        assert_eq!(default_port(&NodeKind::unbalanced::<&str, _>([])), None);
    }

    #[test]
    fn balanced_accepts_legacy_alias_and_branches_only() {
        let kind = NodeKind::balanced("1:2", 3.5);
        assert!(accepts_port(&kind, "out"));
        assert!(accepts_port(&kind, "out-1"));
        assert!(accepts_port(&kind, "out-2"));
        assert!(!accepts_port(&kind, "out-3"));
        assert!(!accepts_port(&kind, "out-0"));
        assert!(!accepts_port(&kind, "out-01"));
    }

    #[test]
    fn oversized_ratio_lists_default_branches() {
        let kind = NodeKind::balanced("1:4294967295", 3.5);
        assert_eq!(names(&output_ports(&kind)), ["out-1", "out-2"]);
        assert!(!accepts_port(&kind, "out-3"));
    }

    #[test]
    fn receiver_accepts_nothing() {
        assert!(!accepts_port(&NodeKind::Receiver, "out"));
    }
}

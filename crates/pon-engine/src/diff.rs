//! Comparison of two propagation results.
//!
//! An editor holds the previous run's nodes and redraws only what
//! [`diff_levels`] reports. Levels are compared bit for bit, so any
//! change in the last ulp counts.

use indexmap::IndexMap;
use pon_core::{ComputedLevels, NodeId};
use pon_topology::Node;

/// One node whose computed levels differ between two runs.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelChange {
    /// Node id.
    pub id: NodeId,
    /// Levels in the earlier run.
    pub before: ComputedLevels,
    /// Levels in the later run.
    pub after: ComputedLevels,
}

/// Differences between two propagation results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelDiff {
    /// Nodes in both runs whose levels differ, in `after` order.
    pub changed: Vec<LevelChange>,
    /// Ids only in `after`.
    pub added: Vec<NodeId>,
    /// Ids only in `before`.
    pub removed: Vec<NodeId>,
}

impl LevelDiff {
    /// `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Every id that needs redrawing: changed, then added.
    pub fn dirty_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.changed.iter().map(|c| &c.id).chain(self.added.iter())
    }
}

/// Compare the computed levels of `before` and `after`, matching nodes by id.
///
/// Only levels are compared. A node whose parameters changed but whose
/// levels did not is not reported.
pub fn diff_levels(before: &[Node], after: &[Node]) -> LevelDiff {
    let old: IndexMap<&NodeId, &Node> = before.iter().map(|n| (&n.id, n)).collect();
    let new: IndexMap<&NodeId, &Node> = after.iter().map(|n| (&n.id, n)).collect();

    let mut diff = LevelDiff::default();
    for (id, node) in &new {
        match old.get(*id) {
            Some(prev) if prev.levels.bits_eq(&node.levels) => {}
            Some(prev) => diff.changed.push(LevelChange {
                id: (*id).clone(),
                before: prev.levels.clone(),
                after: node.levels.clone(),
            }),
            None => diff.added.push((*id).clone()),
        }
    }
    diff.removed = old
        .keys()
        .filter(|id| !new.contains_key(**id))
        .map(|id| (*id).clone())
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::propagate;
    use pon_core::InputLevel;
    use pon_topology::{Link, NodeKind};

    fn chain(attenuation: f64) -> (Vec<Node>, Vec<Link>) {
        let nodes = vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("pad", NodeKind::attenuator(attenuation)),
            Node::new("onu", NodeKind::Receiver),
            Node::new("spare", NodeKind::Receiver),
        ];
        let links = vec![
            Link::new("e1", "olt", "pad").with_length(1000.0),
            Link::new("e2", "pad", "onu"),
        ];
        (nodes, links)
    }

    #[test]
    fn identical_runs_have_no_diff() {
        let (nodes, links) = chain(0.5);
        let a = propagate(&nodes, &links);
        let b = propagate(&nodes, &links);
        assert!(diff_levels(&a, &b).is_empty());
    }

    #[test]
    fn parameter_edit_marks_downstream_only() {
        let (nodes, links) = chain(0.5);
        let before = propagate(&nodes, &links);
        let (nodes, links) = chain(1.5);
        let after = propagate(&nodes, &links);

        let diff = diff_levels(&before, &after);
        let ids: Vec<&str> = diff.changed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["pad", "onu"]);
        assert!(diff.added.is_empty() && diff.removed.is_empty());
    }

    #[test]
    fn membership_changes_are_reported() {
        let (nodes, links) = chain(0.5);
        let before = propagate(&nodes, &links);
        let mut nodes = nodes;
        nodes.retain(|n| n.id.as_str() != "spare");
        nodes.push(Node::new("new", NodeKind::Receiver));
        let after = propagate(&nodes, &links);

        let diff = diff_levels(&before, &after);
        assert!(diff.changed.is_empty());
        assert_eq!(diff.added, [NodeId::new("new")]);
        assert_eq!(diff.removed, [NodeId::new("spare")]);
        let dirty: Vec<&str> = diff.dirty_ids().map(NodeId::as_str).collect();
        assert_eq!(dirty, ["new"]);
    }

    #[test]
    fn signed_zero_counts_as_change() {
        let (nodes, links) = chain(0.0);
        let mut before = propagate(&nodes, &links);
        let mut after = before.clone();
        before[2].levels.input = InputLevel::Dbm(0.0);
        after[2].levels.input = InputLevel::Dbm(-0.0);
        assert_eq!(diff_levels(&before, &after).changed.len(), 1);
    }
}

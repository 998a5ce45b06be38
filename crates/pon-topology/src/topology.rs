//! The [`Topology`] container and its editor-facing mutations.

use indexmap::{IndexMap, IndexSet};
use pon_core::{LinkId, NodeId, PortName, DEFAULT_LOSS_DB_PER_KM};

use crate::error::TopologyError;
use crate::link::Link;
use crate::node::{Node, NodeKind};
use crate::ports::accepts_port;

/// Outgoing links grouped by source node id, in link order.
///
/// Links whose source does not appear in any node list are still
/// grouped; the engine simply never dequeues them.
pub fn outgoing_links(links: &[Link]) -> IndexMap<&NodeId, Vec<&Link>> {
    let mut out: IndexMap<&NodeId, Vec<&Link>> = IndexMap::new();
    for link in links {
        out.entry(&link.source).or_default().push(link);
    }
    out
}

/// An ordered set of nodes and the links between them.
///
/// Every mutation checks the single-feed invariants first and leaves the
/// topology untouched on error. [`Topology::from_parts`] only checks that
/// ids are unique and links are anchored; use [`crate::check`] to audit
/// an imported topology for the rest.
///
/// # Examples
///
/// ```
/// use pon_topology::{Node, NodeKind, Topology, TopologyError};
///
/// let mut t = Topology::new();
/// t.add_node(Node::new("olt", NodeKind::source(3.0))).unwrap();
/// t.add_node(Node::new("onu", NodeKind::Receiver)).unwrap();
/// t.add_node(Node::new("onu2", NodeKind::Receiver)).unwrap();
///
/// t.connect("olt", "onu", "out", 500.0).unwrap();
/// let err = t.connect("olt", "onu2", "out", 500.0).unwrap_err();
/// assert!(matches!(err, TopologyError::PortInUse { .. }));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_link_seq: u64,
}

impl Topology {
    /// An empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology from node and link records.
    ///
    /// Rejects duplicate node ids, duplicate link ids, and links whose
    /// source or target is missing. Single-feed invariants are *not*
    /// enforced here.
    pub fn from_parts(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self, TopologyError> {
        let mut ids: IndexSet<&NodeId> = IndexSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(&node.id) {
                return Err(TopologyError::DuplicateNode(node.id.clone()));
            }
        }
        let mut link_ids: IndexSet<&LinkId> = IndexSet::with_capacity(links.len());
        for link in &links {
            if !link_ids.insert(&link.id) {
                return Err(TopologyError::DuplicateLink(link.id.clone()));
            }
            for end in [&link.source, &link.target] {
                if !ids.contains(end) {
                    return Err(TopologyError::DanglingLink {
                        link: link.id.clone(),
                        node: end.clone(),
                    });
                }
            }
        }
        Ok(Self {
            nodes,
            links,
            next_link_seq: 0,
        })
    }

    /// Split into node and link records.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Link>) {
        (self.nodes, self.links)
    }

    // ── Read accessors ─────────────────────────────────────────────

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links, in insertion order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Look up a link by id.
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id.as_str() == id)
    }

    /// Outgoing links keyed by source node id.
    pub fn outgoing(&self) -> IndexMap<&NodeId, Vec<&Link>> {
        outgoing_links(&self.links)
    }

    /// The link feeding `id`, if any (the first one if several do).
    pub fn input_link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.target.as_str() == id)
    }

    /// Replace every node's computed levels from a propagation result.
    ///
    /// Nodes are matched by id; nodes absent from `computed` keep their
    /// current levels.
    pub fn apply_levels(&mut self, computed: &[Node]) {
        let by_id: IndexMap<&NodeId, &Node> = computed.iter().map(|n| (&n.id, n)).collect();
        for node in &mut self.nodes {
            if let Some(c) = by_id.get(&node.id) {
                node.levels = c.levels.clone();
            }
        }
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Add a node. Fails if the id is taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), TopologyError> {
        if self.node(node.id.as_str()).is_some() {
            return Err(TopologyError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add a pre-built link, applying the same checks as [`connect`](Self::connect).
    pub fn add_link(&mut self, link: Link) -> Result<(), TopologyError> {
        if self.link(link.id.as_str()).is_some() {
            return Err(TopologyError::DuplicateLink(link.id));
        }
        let port = PortName::new(link.logical_port());
        self.check_connect(&link.source, &link.target, &port)?;
        self.links.push(link);
        Ok(())
    }

    /// Link `port` on `source` to the input of `target`.
    ///
    /// The new link uses the default fiber loss rate. Returns its id.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        port: impl Into<PortName>,
        length_m: f64,
    ) -> Result<LinkId, TopologyError> {
        let source = NodeId::new(source);
        let target = NodeId::new(target);
        let port = port.into();
        self.check_connect(&source, &target, &port)?;

        let id = self.fresh_link_id(&source, &target);
        self.links.push(Link {
            id: id.clone(),
            source,
            target,
            source_port: Some(port),
            source_handle: None,
            length_m: clamp_non_negative(length_m),
            loss_db_per_km: DEFAULT_LOSS_DB_PER_KM,
        });
        Ok(id)
    }

    /// Remove a node and every link touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, TopologyError> {
        let idx = self
            .nodes
            .iter()
            .position(|n| n.id.as_str() == id)
            .ok_or_else(|| TopologyError::UnknownNode(NodeId::new(id)))?;
        self.links
            .retain(|l| l.source.as_str() != id && l.target.as_str() != id);
        Ok(self.nodes.remove(idx))
    }

    /// Remove a single link.
    pub fn remove_link(&mut self, id: &str) -> Result<Link, TopologyError> {
        let idx = self
            .links
            .iter()
            .position(|l| l.id.as_str() == id)
            .ok_or_else(|| TopologyError::UnknownLink(LinkId::new(id)))?;
        Ok(self.links.remove(idx))
    }

    /// Change a link's length. Negative and NaN lengths become zero.
    pub fn set_link_length(&mut self, id: &str, length_m: f64) -> Result<(), TopologyError> {
        let link = self.link_mut(id)?;
        link.length_m = clamp_non_negative(length_m);
        Ok(())
    }

    /// Rename a node.
    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<(), TopologyError> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    /// Set or clear a node's description.
    pub fn set_description(
        &mut self,
        id: &str,
        description: Option<String>,
    ) -> Result<(), TopologyError> {
        self.node_mut(id)?.description = description;
        Ok(())
    }

    /// Change a source's launch power.
    pub fn set_launch_power(&mut self, id: &str, dbm: f64) -> Result<(), TopologyError> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            NodeKind::Source { launch_power_dbm } => {
                *launch_power_dbm = Some(dbm);
                Ok(())
            }
            other => Err(TopologyError::KindMismatch {
                node: node.id.clone(),
                expected: "source",
                found: other.name(),
            }),
        }
    }

    /// Change an attenuator's loss. Negative values become zero.
    pub fn set_attenuation(&mut self, id: &str, db: f64) -> Result<(), TopologyError> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            NodeKind::Attenuator { attenuation_db } => {
                *attenuation_db = Some(clamp_non_negative(db));
                Ok(())
            }
            other => Err(TopologyError::KindMismatch {
                node: node.id.clone(),
                expected: "attenuator",
                found: other.name(),
            }),
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, TopologyError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id.as_str() == id)
            .ok_or_else(|| TopologyError::UnknownNode(NodeId::new(id)))
    }

    fn link_mut(&mut self, id: &str) -> Result<&mut Link, TopologyError> {
        self.links
            .iter_mut()
            .find(|l| l.id.as_str() == id)
            .ok_or_else(|| TopologyError::UnknownLink(LinkId::new(id)))
    }

    fn check_connect(
        &self,
        source: &NodeId,
        target: &NodeId,
        port: &PortName,
    ) -> Result<(), TopologyError> {
        let src = self
            .node(source.as_str())
            .ok_or_else(|| TopologyError::UnknownNode(source.clone()))?;
        let dst = self
            .node(target.as_str())
            .ok_or_else(|| TopologyError::UnknownNode(target.clone()))?;
        if source == target {
            return Err(TopologyError::SelfLoop(source.clone()));
        }
        if let Some(existing) = self.input_link(target.as_str()) {
            return Err(TopologyError::TargetAlreadyFed {
                target: target.clone(),
                existing: existing.id.clone(),
            });
        }
        if let Some(existing) = self
            .links
            .iter()
            .find(|l| &l.source == source && l.logical_port() == port.as_str())
        {
            return Err(TopologyError::PortInUse {
                source: source.clone(),
                port: port.clone(),
                existing: existing.id.clone(),
            });
        }
        if dst.kind.is_source() {
            return Err(TopologyError::SourceHasNoInput(target.clone()));
        }
        if !accepts_port(&src.kind, port.as_str()) {
            return Err(TopologyError::UnknownPort {
                node: source.clone(),
                port: port.clone(),
            });
        }
        Ok(())
    }

    fn fresh_link_id(&mut self, source: &NodeId, target: &NodeId) -> LinkId {
        loop {
            self.next_link_seq += 1;
            let id = LinkId::new(format!("e{source}-{target}-{}", self.next_link_seq));
            if self.link(id.as_str()).is_none() {
                return id;
            }
        }
    }
}

fn clamp_non_negative(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_core::{ComputedLevels, InputLevel};

    fn star() -> Topology {
        let mut t = Topology::new();
        t.add_node(Node::new("olt", NodeKind::source(3.0))).unwrap();
        t.add_node(Node::new("split", NodeKind::balanced("1:2", 3.5)))
            .unwrap();
        t.add_node(Node::new("a", NodeKind::Receiver)).unwrap();
        t.add_node(Node::new("b", NodeKind::Receiver)).unwrap();
        t.connect("olt", "split", "out", 1000.0).unwrap();
        t
    }

    #[test]
    fn connect_assigns_unique_ids() {
        let mut t = star();
        let e1 = t.connect("split", "a", "out-1", 0.0).unwrap();
        let e2 = t.connect("split", "b", "out-2", 0.0).unwrap();
        assert_ne!(e1, e2);
        assert_eq!(t.links().len(), 3);
        assert_eq!(t.link(e2.as_str()).unwrap().logical_port(), "out-2");
    }

    #[test]
    fn connect_rejects_second_input() {
        let mut t = star();
        t.connect("split", "a", "out-1", 0.0).unwrap();
        match t.connect("split", "a", "out-2", 0.0) {
            Err(TopologyError::TargetAlreadyFed { target, .. }) => assert_eq!(target.as_str(), "a"),
            other => panic!("expected TargetAlreadyFed, got {other:?}"),
        }
        assert_eq!(t.links().len(), 2);
    }

    #[test]
    fn connect_rejects_reused_port() {
        let mut t = star();
        t.connect("split", "a", "out-1", 0.0).unwrap();
        match t.connect("split", "b", "out-1", 0.0) {
            Err(TopologyError::PortInUse { port, .. }) => assert_eq!(port.as_str(), "out-1"),
            other => panic!("expected PortInUse, got {other:?}"),
        }
    }

    #[test]
    fn connect_rejects_missing_port() {
        let mut t = star();
        match t.connect("split", "a", "out-3", 0.0) {
            Err(TopologyError::UnknownPort { .. }) => {}
            other => panic!("expected UnknownPort, got {other:?}"),
        }
        match t.connect("a", "b", "out", 0.0) {
            Err(TopologyError::UnknownPort { .. }) => {}
            other => panic!("expected UnknownPort from receiver, got {other:?}"),
        }
    }

    #[test]
    fn connect_rejects_self_loop_and_source_target() {
        let mut t = star();
        assert_eq!(
            t.connect("split", "split", "out-1", 0.0),
            Err(TopologyError::SelfLoop(NodeId::new("split")))
        );
        t.add_node(Node::new("olt2", NodeKind::source(3.0))).unwrap();
        assert_eq!(
            t.connect("split", "olt2", "out-1", 0.0),
            Err(TopologyError::SourceHasNoInput(NodeId::new("olt2")))
        );
    }

    #[test]
    fn connect_rejects_unknown_nodes() {
        let mut t = star();
        assert_eq!(
            t.connect("ghost", "a", "out", 0.0),
            Err(TopologyError::UnknownNode(NodeId::new("ghost")))
        );
    }

    #[test]
    fn connect_clamps_negative_length() {
        let mut t = star();
        let id = t.connect("split", "a", "out-1", -50.0).unwrap();
        assert_eq!(t.link(id.as_str()).unwrap().length_m, 0.0);
    }

    #[test]
    fn add_node_rejects_duplicate() {
        let mut t = star();
        assert_eq!(
            t.add_node(Node::new("a", NodeKind::Receiver)),
            Err(TopologyError::DuplicateNode(NodeId::new("a")))
        );
    }

    #[test]
    fn remove_node_cascades_links() {
        let mut t = star();
        t.connect("split", "a", "out-1", 0.0).unwrap();
        t.connect("split", "b", "out-2", 0.0).unwrap();
        t.remove_node("split").unwrap();
        assert!(t.links().is_empty());
        assert_eq!(t.nodes().len(), 3);
        assert!(t.remove_node("split").is_err());
    }

    #[test]
    fn remove_link_frees_target() {
        let mut t = star();
        let id = t.connect("split", "a", "out-1", 0.0).unwrap();
        t.remove_link(id.as_str()).unwrap();
        assert!(t.connect("split", "a", "out-2", 0.0).is_ok());
    }

    #[test]
    fn set_link_length_clamps() {
        let mut t = star();
        let id = t.links()[0].id.clone();
        t.set_link_length(id.as_str(), 250.0).unwrap();
        assert_eq!(t.links()[0].length_m, 250.0);
        t.set_link_length(id.as_str(), f64::NAN).unwrap();
        assert_eq!(t.links()[0].length_m, 0.0);
        assert!(t.set_link_length("nope", 1.0).is_err());
    }

    #[test]
    fn kind_specific_edits_check_kind() {
        let mut t = star();
        t.set_launch_power("olt", 5.0).unwrap();
        assert_eq!(t.node("olt").unwrap().kind, NodeKind::source(5.0));
        match t.set_attenuation("olt", 1.0) {
            Err(TopologyError::KindMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "attenuator");
                assert_eq!(found, "source");
            }
            other => panic!("expected KindMismatch, got {other:?}"),
        }
    }

    #[test]
    fn set_attenuation_clamps_negative() {
        let mut t = Topology::new();
        t.add_node(Node::new("att", NodeKind::attenuator(0.5))).unwrap();
        t.set_attenuation("att", -2.0).unwrap();
        assert_eq!(t.node("att").unwrap().kind, NodeKind::attenuator(0.0));
    }

    #[test]
    fn from_parts_rejects_dangling_link() {
        let nodes = vec![Node::new("olt", NodeKind::source(3.0))];
        let links = vec![Link::new("e1", "olt", "missing")];
        match Topology::from_parts(nodes, links) {
            Err(TopologyError::DanglingLink { link, node }) => {
                assert_eq!(link.as_str(), "e1");
                assert_eq!(node.as_str(), "missing");
            }
            other => panic!("expected DanglingLink, got {other:?}"),
        }
    }

    #[test]
    fn from_parts_tolerates_invariant_violations() {
        let nodes = vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("att", NodeKind::attenuator(1.0)),
            Node::new("onu", NodeKind::Receiver),
        ];
        let links = vec![
            Link::new("e1", "olt", "onu"),
            Link::new("e2", "att", "onu"),
        ];
        let t = Topology::from_parts(nodes, links).unwrap();
        assert_eq!(t.outgoing().len(), 2);
    }

    #[test]
    fn from_parts_rejects_duplicate_link_ids() {
        let nodes = vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("onu", NodeKind::Receiver),
        ];
        let links = vec![Link::new("e1", "olt", "onu"), Link::new("e1", "olt", "onu")];
        assert_eq!(
            Topology::from_parts(nodes, links),
            Err(TopologyError::DuplicateLink(LinkId::new("e1")))
        );
    }

    #[test]
    fn outgoing_groups_by_source_in_link_order() {
        let mut t = star();
        t.connect("split", "b", "out-2", 0.0).unwrap();
        t.connect("split", "a", "out-1", 0.0).unwrap();
        let out = t.outgoing();
        let from_split: Vec<&str> = out[&NodeId::new("split")]
            .iter().map(|l| l.target.as_str()).collect();
        assert_eq!(from_split, ["b", "a"]);
    }

    #[test]
    fn apply_levels_matches_by_id() {
        let mut t = star();
        let mut computed = t.nodes()[1].clone();
        computed.levels = ComputedLevels {
            input: InputLevel::Dbm(2.65),
            outputs: Default::default(),
        };
        t.apply_levels(&[computed]);
        assert_eq!(t.node("split").unwrap().levels.input, InputLevel::Dbm(2.65));
        assert_eq!(t.node("olt").unwrap().levels.input, InputLevel::NoSignal);
    }
}

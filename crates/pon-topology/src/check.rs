//! Structural audit of a topology.
//!
//! [`Topology::from_parts`] accepts documents that break the single-feed
//! rules; [`check`] reports what is wrong with them without refusing to
//! hold them. The engine terminates on every input regardless, but its
//! result is only meaningful when `check` reports no errors.

use std::collections::VecDeque;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use pon_core::{LinkId, NodeId};

use crate::link::Link;
use crate::node::{Node, NodeKind};
use crate::ports::accepts_port;
use crate::ratio::SplitRatio;
use crate::topology::Topology;

/// How much a violation matters. Ordered: `Info < Warning < Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Worth noting; levels are still meaningful.
    Info,
    /// Levels are computed but probably not what was intended.
    Warning,
    /// Levels depend on traversal order or are undefined.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// The rule a [`Violation`] breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A node has more than one incoming link.
    MultipleInputs,
    /// Two links leave the same port of the same node.
    PortFedTwice,
    /// A link terminates on a source.
    SourceWithInput,
    /// A link leaves a port its source does not produce.
    UnknownPort,
    /// Nodes lie on a directed cycle.
    Cycle,
    /// A node has no path from any source.
    Unreachable,
    /// A balanced splitter ratio is malformed or not a power of two.
    NonStandardRatio,
    /// A loss or length parameter is negative.
    NegativeParameter,
}

impl ViolationKind {
    /// The fixed severity of this rule.
    pub fn severity(self) -> Severity {
        match self {
            Self::MultipleInputs | Self::PortFedTwice | Self::SourceWithInput | Self::Cycle => {
                Severity::Error
            }
            Self::UnknownPort | Self::NonStandardRatio | Self::NegativeParameter => {
                Severity::Warning
            }
            Self::Unreachable => Severity::Info,
        }
    }
}

/// One finding from [`check`].
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    /// Which rule.
    pub kind: ViolationKind,
    /// Copied from `kind.severity()`.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Affected nodes, in topology order.
    pub nodes: Vec<NodeId>,
    /// Affected links, in topology order.
    pub links: Vec<LinkId>,
}

impl Violation {
    fn new(kind: ViolationKind, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    fn with_nodes<'a>(mut self, nodes: impl IntoIterator<Item = &'a NodeId>) -> Self {
        self.nodes.extend(nodes.into_iter().cloned());
        self
    }

    fn with_links<'a>(mut self, links: impl IntoIterator<Item = &'a Link>) -> Self {
        self.links.extend(links.into_iter().map(|l| l.id.clone()));
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// `true` if any violation is error-severity.
pub fn has_errors(violations: &[Violation]) -> bool {
    violations.iter().any(|v| v.severity == Severity::Error)
}

/// Audit `topology` against every structural rule.
///
/// Violations are grouped by rule in [`ViolationKind`] declaration order;
/// within a rule they follow node or link order.
pub fn check(topology: &Topology) -> Vec<Violation> {
    let mut out = Vec::new();
    multiple_inputs(topology, &mut out);
    ports_fed_twice(topology, &mut out);
    source_inputs(topology, &mut out);
    unknown_ports(topology, &mut out);
    cycles(topology, &mut out);
    unreachable(topology, &mut out);
    ratios(topology, &mut out);
    negative_parameters(topology, &mut out);
    out
}

// ── Feed rules ──────────────────────────────────────────────────────

fn multiple_inputs(t: &Topology, out: &mut Vec<Violation>) {
    let mut incoming: IndexMap<&NodeId, Vec<&Link>> = IndexMap::new();
    for link in t.links() {
        incoming.entry(&link.target).or_default().push(link);
    }
    for node in t.nodes() {
        let Some(links) = incoming.get(&node.id) else {
            continue;
        };
        if links.len() > 1 {
            out.push(
                Violation::new(
                    ViolationKind::MultipleInputs,
                    format!("node '{}' has {} incoming links", node.id, links.len()),
                )
                .with_nodes([&node.id])
                .with_links(links.iter().copied()),
            );
        }
    }
}

fn ports_fed_twice(t: &Topology, out: &mut Vec<Violation>) {
    let mut by_port: IndexMap<(&NodeId, &str), Vec<&Link>> = IndexMap::new();
    for link in t.links() {
        by_port
            .entry((&link.source, link.logical_port()))
            .or_default()
            .push(link);
    }
    for ((source, port), links) in by_port {
        if links.len() > 1 {
            out.push(
                Violation::new(
                    ViolationKind::PortFedTwice,
                    format!(
                        "port '{port}' on node '{source}' feeds {} links",
                        links.len()
                    ),
                )
                .with_nodes([source])
                .with_links(links),
            );
        }
    }
}

fn nodes_by_id(t: &Topology) -> IndexMap<&NodeId, &Node> {
    t.nodes().iter().map(|n| (&n.id, n)).collect()
}

fn source_inputs(t: &Topology, out: &mut Vec<Violation>) {
    let nodes = nodes_by_id(t);
    for link in t.links() {
        if nodes.get(&link.target).is_some_and(|n| n.kind.is_source()) {
            out.push(
                Violation::new(
                    ViolationKind::SourceWithInput,
                    format!("link '{}' terminates on source '{}'", link.id, link.target),
                )
                .with_nodes([&link.target])
                .with_links([link]),
            );
        }
    }
}

fn unknown_ports(t: &Topology, out: &mut Vec<Violation>) {
    let nodes = nodes_by_id(t);
    for link in t.links() {
        let Some(source) = nodes.get(&link.source) else {
            continue;
        };
        let port = link.logical_port();
        if !accepts_port(&source.kind, port) {
            out.push(
                Violation::new(
                    ViolationKind::UnknownPort,
                    format!(
                        "link '{}' leaves port '{port}', which {} '{}' does not produce",
                        link.id,
                        source.kind.name(),
                        source.id
                    ),
                )
                .with_nodes([&source.id])
                .with_links([link]),
            );
        }
    }
}

// ── Graph shape ─────────────────────────────────────────────────────

/// Node-index adjacency. Links with a missing endpoint are ignored.
struct Graph<'a> {
    index: IndexSet<&'a NodeId>,
    forward: Vec<Vec<usize>>,
    backward: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
    fn new(t: &'a Topology) -> Self {
        let index: IndexSet<&NodeId> = t.nodes().iter().map(|n| &n.id).collect();
        let mut forward = vec![Vec::new(); index.len()];
        let mut backward = vec![Vec::new(); index.len()];
        for link in t.links() {
            if let (Some(s), Some(d)) = (
                index.get_index_of(&link.source),
                index.get_index_of(&link.target),
            ) {
                forward[s].push(d);
                backward[d].push(s);
            }
        }
        Self {
            index,
            forward,
            backward,
        }
    }

    /// Strongly connected components (iterative Kosaraju).
    ///
    /// Returns one component id per node index.
    fn components(&self) -> Vec<usize> {
        let n = self.index.len();

        let mut visited = vec![false; n];
        let mut finish = Vec::with_capacity(n);
        let mut stack: Vec<(usize, usize)> = Vec::new();
        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            stack.push((root, 0));
            while let Some(top) = stack.last_mut() {
                let (u, next) = *top;
                if let Some(&v) = self.forward[u].get(next) {
                    top.1 += 1;
                    if !visited[v] {
                        visited[v] = true;
                        stack.push((v, 0));
                    }
                } else {
                    finish.push(u);
                    stack.pop();
                }
            }
        }

        let mut comp = vec![usize::MAX; n];
        let mut next_comp = 0;
        let mut work = Vec::new();
        for &root in finish.iter().rev() {
            if comp[root] != usize::MAX {
                continue;
            }
            comp[root] = next_comp;
            work.push(root);
            while let Some(u) = work.pop() {
                for &v in &self.backward[u] {
                    if comp[v] == usize::MAX {
                        comp[v] = next_comp;
                        work.push(v);
                    }
                }
            }
            next_comp += 1;
        }
        comp
    }
}

fn cycles(t: &Topology, out: &mut Vec<Violation>) {
    let graph = Graph::new(t);
    let comp = graph.components();

    let mut sizes: IndexMap<usize, usize> = IndexMap::new();
    for &c in &comp {
        *sizes.entry(c).or_default() += 1;
    }
    let self_loop = |i: usize| graph.forward[i].contains(&i);

    // Group in order of each component's first node.
    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for (i, &c) in comp.iter().enumerate() {
        if sizes[&c] > 1 || self_loop(i) {
            groups.entry(c).or_default().push(i);
        }
    }

    for members in groups.values() {
        let ids: Vec<&NodeId> = members.iter().map(|&i| graph.index[i]).collect();
        let inside: IndexSet<&NodeId> = ids.iter().copied().collect();
        let links = t
            .links()
            .iter()
            .filter(|l| inside.contains(&l.source) && inside.contains(&l.target));
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        out.push(
            Violation::new(
                ViolationKind::Cycle,
                format!("nodes [{}] form a directed cycle", names.join(", ")),
            )
            .with_nodes(ids.iter().copied())
            .with_links(links),
        );
    }
}

fn unreachable(t: &Topology, out: &mut Vec<Violation>) {
    let graph = Graph::new(t);
    let mut seen = vec![false; graph.index.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for (i, node) in t.nodes().iter().enumerate() {
        if node.kind.is_source() {
            seen[i] = true;
            queue.push_back(i);
        }
    }
    while let Some(u) = queue.pop_front() {
        for &v in &graph.forward[u] {
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    for (node, reached) in t.nodes().iter().zip(seen) {
        if !reached {
            out.push(
                Violation::new(
                    ViolationKind::Unreachable,
                    format!("{} '{}' has no path from any source", node.kind.name(), node.id),
                )
                .with_nodes([&node.id]),
            );
        }
    }
}

// ── Parameters ──────────────────────────────────────────────────────

fn ratios(t: &Topology, out: &mut Vec<Violation>) {
    for node in t.nodes() {
        let NodeKind::SplitterBalanced {
            ratio: Some(ratio), ..
        } = &node.kind
        else {
            continue;
        };
        let message = match SplitRatio::parse(ratio) {
            None => format!("splitter '{}' has malformed ratio '{ratio}'", node.id),
            Some(r) if !r.is_standard() => {
                format!("splitter '{}' has non-standard ratio '{r}'", node.id)
            }
            Some(_) => continue,
        };
        out.push(Violation::new(ViolationKind::NonStandardRatio, message).with_nodes([&node.id]));
    }
}

fn negative_parameters(t: &Topology, out: &mut Vec<Violation>) {
    for node in t.nodes() {
        if let NodeKind::Attenuator {
            attenuation_db: Some(db),
        } = node.kind
        {
            if db < 0.0 {
                out.push(
                    Violation::new(
                        ViolationKind::NegativeParameter,
                        format!("attenuator '{}' has negative attenuation {db} dB", node.id),
                    )
                    .with_nodes([&node.id]),
                );
            }
        }
    }
    for link in t.links() {
        if link.length_m < 0.0 {
            out.push(
                Violation::new(
                    ViolationKind::NegativeParameter,
                    format!("link '{}' has negative length {} m", link.id, link.length_m),
                )
                .with_links([link]),
            );
        }
        if link.loss_db_per_km < 0.0 {
            out.push(
                Violation::new(
                    ViolationKind::NegativeParameter,
                    format!(
                        "link '{}' has negative loss rate {} dB/km",
                        link.id, link.loss_db_per_km
                    ),
                )
                .with_links([link]),
            );
        }
    }
}

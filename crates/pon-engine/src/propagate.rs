//! Forward level propagation from sources.
//!
//! A breadth-first sweep: sources are seeded in node order, then each
//! dequeued node pushes its output levels along its outgoing links in
//! link order. Each node is assigned an input at most once per run (the
//! *settled* guard), so the sweep ends on any graph in O(V + E), cyclic
//! or multiply-fed ones included. On a single-fed acyclic topology the
//! guard never fires.

use std::collections::VecDeque;

use indexmap::IndexMap;
use pon_core::{ComputedLevels, InputLevel, NodeId};
use pon_topology::{outgoing_links, Link, Node, NodeKind};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::outputs::{output_levels, source_outputs};

/// Counters from one propagation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Links that carried a level to their target.
    pub links_followed: usize,
    /// Links whose source never produced their logical port.
    pub skipped_missing_port: usize,
    /// Links into a node that already had its input.
    pub skipped_settled: usize,
    /// Links whose target is not in the node list.
    pub skipped_dangling: usize,
    /// Nodes with a level after the run, sources included.
    pub nodes_reached: usize,
}

/// Compute every node's levels with the default [`EngineConfig`].
///
/// Returns a copy of `nodes`, same order and ids, with
/// [`Node::levels`](pon_topology::Node::levels) rewritten. The inputs are
/// not modified and any levels they carry are ignored.
pub fn propagate(nodes: &[Node], links: &[Link]) -> Vec<Node> {
    propagate_with(&EngineConfig::default(), nodes, links).0
}

/// Compute every node's levels with an explicit configuration.
///
/// `config` is used as given; call [`EngineConfig::validate`] first if it
/// comes from user input.
pub fn propagate_with(
    config: &EngineConfig,
    nodes: &[Node],
    links: &[Link],
) -> (Vec<Node>, PropagationStats) {
    let mut result: Vec<Node> = nodes
        .iter()
        .map(|n| n.with_levels(ComputedLevels::unreached()))
        .collect();

    // First occurrence wins if ids repeat.
    let mut index: IndexMap<&NodeId, usize> = IndexMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(&node.id).or_insert(i);
    }
    let outgoing = outgoing_links(links);

    let mut settled = vec![false; nodes.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stats = PropagationStats::default();

    for (i, node) in nodes.iter().enumerate() {
        if let NodeKind::Source { launch_power_dbm } = node.kind {
            result[i].levels = ComputedLevels {
                input: InputLevel::NotApplicable,
                outputs: source_outputs(launch_power_dbm, config),
            };
            settled[i] = true;
            queue.push_back(i);
        }
    }

    while let Some(u) = queue.pop_front() {
        let Some(out_links) = outgoing.get(&nodes[u].id) else {
            continue;
        };
        for link in out_links {
            let port = link.logical_port();
            let Some(level) = result[u].levels.output(port) else {
                debug!(link = %link.id, source = %link.source, port, "source has no such port, link skipped");
                stats.skipped_missing_port += 1;
                continue;
            };
            let Some(&v) = index.get(&link.target) else {
                debug!(link = %link.id, target = %link.target, "target not found, link skipped");
                stats.skipped_dangling += 1;
                continue;
            };
            if settled[v] {
                debug!(link = %link.id, target = %link.target, "target already has an input, link skipped");
                stats.skipped_settled += 1;
                continue;
            }

            let input = level - link.cable_loss_db();
            let target = &nodes[v];
            result[v].levels = ComputedLevels {
                input: InputLevel::Dbm(input),
                outputs: output_levels(&target.id, &target.kind, input, config),
            };
            settled[v] = true;
            queue.push_back(v);
            stats.links_followed += 1;
            trace!(link = %link.id, target = %target.id, port, input, "level propagated");
        }
    }

    stats.nodes_reached = settled.iter().filter(|&&s| s).count();
    debug!(
        nodes = nodes.len(),
        links = links.len(),
        reached = stats.nodes_reached,
        followed = stats.links_followed,
        skipped_missing_port = stats.skipped_missing_port,
        skipped_settled = stats.skipped_settled,
        skipped_dangling = stats.skipped_dangling,
        "propagation complete"
    );
    (result, stats)
}

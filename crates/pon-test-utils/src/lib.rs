//! Test fixtures and level helpers for pon development.
//!
//! [`fixtures`] holds the reference topologies with hand-computed
//! expected levels; the free functions here read levels back out of a
//! propagation result by node id.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use pon_core::InputLevel;
use pon_topology::Node;

/// Tolerance for comparing hand-computed dB values.
pub const DB_EPSILON: f64 = 1e-9;

/// Find a node by id.
///
/// # Panics
///
/// Panics if no node has this id.
pub fn node<'a>(nodes: &'a [Node], id: &str) -> &'a Node {
    nodes
        .iter()
        .find(|n| n.id.as_str() == id)
        .unwrap_or_else(|| panic!("no node '{id}' in result"))
}

/// Input level of `id`, `None` if unreached or a source.
pub fn input_dbm(nodes: &[Node], id: &str) -> Option<f64> {
    node(nodes, id).levels.input.dbm()
}

/// Input marker of `id`.
pub fn input_of(nodes: &[Node], id: &str) -> InputLevel {
    node(nodes, id).levels.input
}

/// Output level of `id` on `port`.
pub fn output_dbm(nodes: &[Node], id: &str, port: &str) -> Option<f64> {
    node(nodes, id).levels.output(port)
}

/// Assert that `id` was reached with an input within [`DB_EPSILON`] of `expected`.
///
/// # Panics
///
/// Panics with both values on mismatch, or if the node was not reached.
pub fn assert_input(nodes: &[Node], id: &str, expected: f64) {
    match input_dbm(nodes, id) {
        Some(actual) => assert!(
            (actual - expected).abs() < DB_EPSILON,
            "node '{id}': expected input {expected} dBm, got {actual} dBm"
        ),
        None => panic!(
            "node '{id}': expected input {expected} dBm, got {:?}",
            input_of(nodes, id)
        ),
    }
}

/// Assert that no signal reached `id`.
pub fn assert_unreached(nodes: &[Node], id: &str) {
    assert_eq!(
        input_of(nodes, id),
        InputLevel::NoSignal,
        "node '{id}' should be unreached"
    );
    assert!(node(nodes, id).levels.outputs.is_empty());
}

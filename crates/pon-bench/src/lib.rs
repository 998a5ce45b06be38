//! Benchmark topologies for pon.
//!
//! Deterministic networks at three scales:
//!
//! - [`reference_profile`]: 1:8 feeder into 1:32 distribution (256 receivers)
//! - [`stress_profile`]: 1:64 into 1:128 (8192 receivers)
//! - [`chain_profile`]: a long series chain of attenuators
//!
//! Lengths come from a fixed multiplicative hash of the element index, so
//! every run benchmarks the same network.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pon_topology::{Link, Node, NodeKind, Topology, TopologyError};

/// Deterministic length in `[min, min + span)` meters for element `i`.
pub fn span_length(i: u64, min: f64, span: u64) -> f64 {
    let h = i.wrapping_mul(6364136223846793007).wrapping_add(1442695040888963407);
    min + ((h >> 33) % span.max(1)) as f64
}

/// Two-stage split tree: source, `1:first` feeder splitter, one
/// `1:second` distribution splitter per feeder branch, receivers on
/// every leaf port.
pub fn split_profile(first: u32, second: u32) -> Result<Topology, TopologyError> {
    let mut t = Topology::new();
    t.add_node(Node::new("olt", NodeKind::source(5.0)))?;
    t.add_node(Node::new("feeder", NodeKind::balanced(format!("1:{first}"), split_loss(first))))?;
    t.connect("olt", "feeder", "out", 4000.0)?;

    let mut leaf = 0u64;
    for i in 1..=first {
        let dist = format!("d{i}");
        t.add_node(Node::new(
            dist.as_str(),
            NodeKind::balanced(format!("1:{second}"), split_loss(second)),
        ))?;
        t.connect(
            "feeder",
            &dist,
            format!("out-{i}"),
            span_length(u64::from(i), 500.0, 3000),
        )?;
        for j in 1..=second {
            leaf += 1;
            let onu = format!("onu{i}_{j}");
            t.add_node(Node::new(onu.as_str(), NodeKind::Receiver))?;
            t.connect(&dist, &onu, format!("out-{j}"), span_length(leaf, 20.0, 400))?;
        }
    }
    Ok(t)
}

/// 1:8 feeder into 1:32 distribution splitters.
pub fn reference_profile() -> Result<Topology, TopologyError> {
    split_profile(8, 32)
}

/// 1:64 feeder into 1:128 distribution splitters.
pub fn stress_profile() -> Result<Topology, TopologyError> {
    split_profile(64, 128)
}

/// A source followed by `len` 0.1 dB attenuators in series, ending in a receiver.
pub fn chain_profile(len: usize) -> Result<Topology, TopologyError> {
    let mut nodes = Vec::with_capacity(len + 2);
    let mut links = Vec::with_capacity(len + 1);
    nodes.push(Node::new("olt", NodeKind::source(5.0)));
    let mut prev = "olt".to_string();
    for i in 0..len {
        let id = format!("a{i}");
        nodes.push(Node::new(id.as_str(), NodeKind::attenuator(0.1)));
        links.push(
            Link::new(format!("e{i}"), prev.as_str(), id.as_str())
                .with_length(span_length(i as u64, 1.0, 50)),
        );
        prev = id;
    }
    nodes.push(Node::new("onu", NodeKind::Receiver));
    links.push(Link::new("e_last", prev.as_str(), "onu"));
    Topology::from_parts(nodes, links)
}

fn split_loss(branches: u32) -> f64 {
    3.5 * f64::from(branches.max(2)).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_topology::check;

    #[test]
    fn reference_profile_shape() {
        let t = reference_profile().unwrap();
        assert_eq!(t.nodes().len(), 2 + 8 + 8 * 32);
        assert_eq!(t.links().len(), t.nodes().len() - 1);
        assert!(check(&t).is_empty());
    }

    #[test]
    fn chain_profile_shape() {
        let t = chain_profile(100).unwrap();
        assert_eq!(t.nodes().len(), 102);
        assert_eq!(t.links().len(), 101);
        assert!(check(&t).is_empty());
    }

    #[test]
    fn span_length_is_deterministic_and_bounded() {
        for i in 0..1000 {
            let l = span_length(i, 20.0, 400);
            assert_eq!(l, span_length(i, 20.0, 400));
            assert!((20.0..420.0).contains(&l));
        }
    }
}

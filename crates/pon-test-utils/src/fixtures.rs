//! Reference topologies.
//!
//! Each scenario documents the levels a correct engine produces. The
//! generated trees are deterministic, so benches and property tests see
//! the same network on every run.

use pon_topology::{Link, Node, NodeKind, Topology};

fn built(nodes: Vec<Node>, links: Vec<Link>) -> Topology {
    Topology::from_parts(nodes, links).unwrap_or_else(|e| panic!("fixture is malformed: {e}"))
}

/// Source(3 dBm) -1000 m-> 1:2 splitter(3.5 dB) -0 m-> receiver.
///
/// Receiver input: 3 - 0.35 - 3.5 = -0.85 dBm.
pub fn balanced_split() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("split", NodeKind::balanced("1:2", 3.5)),
            Node::new("onu", NodeKind::Receiver),
        ],
        vec![
            Link::new("e1", "olt", "split").with_port("out").with_length(1000.0),
            Link::new("e2", "split", "onu").with_port("out-1"),
        ],
    )
}

/// Source(3 dBm) -100 m-> 5/95 tap(14 dB / 1 dB) fanning out to two receivers.
///
/// Splitter input 2.965; `onu_a` on `out-5` -11.035; `onu_b` on `out-95` 1.965.
pub fn unbalanced_split() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new(
                "split",
                NodeKind::unbalanced([("out-5", 14.0), ("out-95", 1.0)]),
            ),
            Node::new("onu_a", NodeKind::Receiver),
            Node::new("onu_b", NodeKind::Receiver),
        ],
        vec![
            Link::new("e1", "olt", "split").with_length(100.0),
            Link::new("e2", "split", "onu_a").with_port("out-5"),
            Link::new("e3", "split", "onu_b").with_port("out-95"),
        ],
    )
}

/// Source(3 dBm) -0 m-> attenuator(0.5 dB) -0 m-> receiver. Receiver input 2.5.
pub fn attenuator_chain() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("pad", NodeKind::attenuator(0.5)),
            Node::new("onu", NodeKind::Receiver),
        ],
        vec![
            Link::new("e1", "olt", "pad"),
            Link::new("e2", "pad", "onu"),
        ],
    )
}

/// A 1:2 splitter whose link to `onu_lost` names `out-3`.
///
/// `onu_ok` on `out-1` gets -0.5 dBm; `onu_lost` stays unreached.
pub fn missing_port() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("split", NodeKind::balanced("1:2", 3.5)),
            Node::new("onu_ok", NodeKind::Receiver),
            Node::new("onu_lost", NodeKind::Receiver),
        ],
        vec![
            Link::new("e1", "olt", "split"),
            Link::new("e2", "split", "onu_ok").with_port("out-1"),
            Link::new("e3", "split", "onu_lost").with_port("out-3"),
        ],
    )
}

/// A balanced splitter with neither ratio nor loss, fed 3 dBm directly.
///
/// Reads as 1:2 at 3.5 dB: ports `out-1`, `out-2`, `out` at -0.5 dBm.
pub fn bare_splitter() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new(
                "split",
                NodeKind::SplitterBalanced {
                    ratio: None,
                    insertion_loss_db: None,
                },
            ),
            Node::new("onu", NodeKind::Receiver),
        ],
        vec![
            Link::new("e1", "olt", "split"),
            Link::new("e2", "split", "onu").with_port("out-2"),
        ],
    )
}

/// Source feeding a ring of three 1 dB attenuators (`a -> b -> c -> a`).
///
/// Inputs: a 3.0, b 2.0, c 1.0. The closing link `c -> a` is not followed.
pub fn ring() -> Topology {
    built(
        vec![
            Node::new("olt", NodeKind::source(3.0)),
            Node::new("a", NodeKind::attenuator(1.0)),
            Node::new("b", NodeKind::attenuator(1.0)),
            Node::new("c", NodeKind::attenuator(1.0)),
        ],
        vec![
            Link::new("e0", "olt", "a"),
            Link::new("e1", "a", "b"),
            Link::new("e2", "b", "c"),
            Link::new("e3", "c", "a"),
        ],
    )
}

/// A two-stage split tree: one source, a `1:first` splitter 2 km out,
/// a connector and a `1:second` splitter on every branch, and a receiver
/// on every leaf port. Drop lengths vary with the leaf index.
///
/// Node count: `2 + 2 * first + first * second`.
pub fn split_tree(first: u32, second: u32) -> Topology {
    let mut t = Topology::new();
    add(&mut t, Node::new("olt", NodeKind::source(3.0)));
    add(
        &mut t,
        Node::new("root", NodeKind::balanced(format!("1:{first}"), split_loss(first))),
    );
    connect(&mut t, "olt", "root", "out", 2000.0);

    for i in 1..=first {
        let conn = format!("c{i}");
        let split = format!("s{i}");
        add(&mut t, Node::new(conn.as_str(), NodeKind::attenuator(0.5)));
        add(
            &mut t,
            Node::new(split.as_str(), NodeKind::balanced(format!("1:{second}"), split_loss(second))),
        );
        connect(&mut t, "root", &conn, &format!("out-{i}"), 500.0 * f64::from(i));
        connect(&mut t, &conn, &split, "out", 0.0);
        for j in 1..=second {
            let onu = format!("onu{i}_{j}");
            add(&mut t, Node::new(onu.as_str(), NodeKind::Receiver));
            let drop = f64::from((i * 37 + j * 113) % 900) + 50.0;
            connect(&mut t, &split, &onu, &format!("out-{j}"), drop);
        }
    }
    t
}

/// 3.5 dB per doubling, as catalogued.
fn split_loss(branches: u32) -> f64 {
    3.5 * f64::from(branches.max(2)).log2()
}

fn add(t: &mut Topology, node: Node) {
    t.add_node(node)
        .unwrap_or_else(|e| panic!("fixture is malformed: {e}"));
}

fn connect(t: &mut Topology, source: &str, target: &str, port: &str, length_m: f64) {
    t.connect(source, target, port, length_m)
        .unwrap_or_else(|e| panic!("fixture is malformed: {e}"));
}

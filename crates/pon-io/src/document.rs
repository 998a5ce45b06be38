//! Conversion between wire records and the topology model.

use std::io::{Read, Write};

use indexmap::IndexMap;
use pon_core::{ComputedLevels, NodeId, PortName};
use pon_engine::EngineConfig;
use pon_topology::{Link, Node, NodeKind, Position, Topology};
use tracing::debug;

use crate::error::ImportError;
use crate::wire::{
    DocumentRecord, EdgeDataRecord, EdgeRecord, NodeDataRecord, NodeRecord, PositionRecord,
    KIND_ATTENUATOR, KIND_RECEIVER, KIND_SOURCE, KIND_SPLITTER_BALANCED, KIND_SPLITTER_UNBALANCED,
};

// ── Import ─────────────────────────────────────────────────────────

/// Read a topology document with the default [`EngineConfig`].
pub fn load_topology<R: Read>(reader: R) -> Result<Topology, ImportError> {
    load_topology_with(reader, &EngineConfig::default())
}

/// Read a topology document. Links without `lossPerKm` get
/// `config.default_loss_db_per_km`.
pub fn load_topology_with<R: Read>(
    reader: R,
    config: &EngineConfig,
) -> Result<Topology, ImportError> {
    let doc: DocumentRecord = serde_json::from_reader(reader)?;
    from_document(doc, config)
}

/// Parse a topology document held in memory.
pub fn topology_from_str(s: &str) -> Result<Topology, ImportError> {
    let doc: DocumentRecord = serde_json::from_str(s)?;
    from_document(doc, &EngineConfig::default())
}

/// Convert parsed records into a [`Topology`].
///
/// Stored `inputSignal`/`outputSignals` are dropped: levels are only
/// ever produced by propagation.
pub fn from_document(doc: DocumentRecord, config: &EngineConfig) -> Result<Topology, ImportError> {
    let mut stale = 0usize;
    let mut nodes = Vec::with_capacity(doc.nodes.len());
    for record in doc.nodes {
        if record.data.input_signal.is_some() || record.data.output_signals.is_some() {
            stale += 1;
        }
        nodes.push(node_from_record(record)?);
    }
    let links: Vec<Link> = doc
        .edges
        .into_iter()
        .map(|r| link_from_record(r, config))
        .collect();
    if stale > 0 {
        debug!(nodes = stale, "discarded stored levels from document");
    }
    debug!(nodes = nodes.len(), links = links.len(), "document imported");
    Ok(Topology::from_parts(nodes, links)?)
}

fn node_from_record(record: NodeRecord) -> Result<Node, ImportError> {
    let NodeRecord {
        id,
        kind,
        position,
        data,
    } = record;
    let kind = match kind.as_str() {
        KIND_SOURCE => NodeKind::Source {
            launch_power_dbm: data.power,
        },
        KIND_SPLITTER_BALANCED => NodeKind::SplitterBalanced {
            ratio: data.ratio,
            insertion_loss_db: data.loss,
        },
        KIND_SPLITTER_UNBALANCED => NodeKind::SplitterUnbalanced {
            ratio: data.ratio,
            port_losses: data
                .port_losses
                .unwrap_or_default()
                .into_iter()
                .map(|(port, loss)| (PortName::new(port), loss))
                .collect(),
        },
        KIND_ATTENUATOR => NodeKind::Attenuator {
            attenuation_db: data.attenuation,
        },
        KIND_RECEIVER => NodeKind::Receiver,
        _ => return Err(ImportError::UnknownKind { node: id, kind }),
    };
    Ok(Node {
        label: data.label.unwrap_or_else(|| id.clone()),
        id: NodeId::new(id),
        description: data.description,
        position: position.map(|p| Position { x: p.x, y: p.y }),
        kind,
        levels: ComputedLevels::unreached(),
    })
}

fn link_from_record(record: EdgeRecord, config: &EngineConfig) -> Link {
    Link {
        id: record.id.into(),
        source: record.source.into(),
        target: record.target.into(),
        source_port: record.data.source_port.map(PortName::new),
        source_handle: record.source_handle,
        length_m: record.data.length.unwrap_or(0.0),
        loss_db_per_km: record
            .data
            .loss_per_km
            .unwrap_or(config.default_loss_db_per_km),
    }
}

// ── Export ─────────────────────────────────────────────────────────

/// Write `topology` as a pretty-printed document.
///
/// With `levels` (a propagation result), each node also carries its
/// computed `inputSignal` and `outputSignals`, matched by id.
pub fn save_topology<W: Write>(
    writer: W,
    topology: &Topology,
    levels: Option<&[Node]>,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(writer, &to_document(topology, levels))
}

/// [`save_topology`] into a `String`.
pub fn topology_to_string(
    topology: &Topology,
    levels: Option<&[Node]>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_document(topology, levels))
}

/// Convert a [`Topology`] into wire records.
pub fn to_document(topology: &Topology, levels: Option<&[Node]>) -> DocumentRecord {
    let computed: Option<IndexMap<&NodeId, &ComputedLevels>> =
        levels.map(|nodes| nodes.iter().map(|n| (&n.id, &n.levels)).collect());
    DocumentRecord {
        nodes: topology
            .nodes()
            .iter()
            .map(|n| {
                let levels = computed.as_ref().and_then(|c| c.get(&n.id).copied());
                node_to_record(n, levels)
            })
            .collect(),
        edges: topology.links().iter().map(link_to_record).collect(),
    }
}

fn node_to_record(node: &Node, levels: Option<&ComputedLevels>) -> NodeRecord {
    let mut data = NodeDataRecord {
        label: Some(node.label.clone()),
        description: node.description.clone(),
        input_signal: levels.and_then(|l| l.input.dbm()),
        output_signals: levels.map(|l| {
            l.outputs
                .iter()
                .map(|(port, dbm)| (port.to_string(), *dbm))
                .collect()
        }),
        ..NodeDataRecord::default()
    };
    let tag = match &node.kind {
        NodeKind::Source { launch_power_dbm } => {
            data.power = *launch_power_dbm;
            KIND_SOURCE
        }
        NodeKind::SplitterBalanced {
            ratio,
            insertion_loss_db,
        } => {
            data.ratio = ratio.clone();
            data.loss = *insertion_loss_db;
            KIND_SPLITTER_BALANCED
        }
        NodeKind::SplitterUnbalanced { ratio, port_losses } => {
            data.ratio = ratio.clone();
            data.port_losses = Some(
                port_losses
                    .iter()
                    .map(|(port, loss)| (port.to_string(), *loss))
                    .collect(),
            );
            KIND_SPLITTER_UNBALANCED
        }
        NodeKind::Attenuator { attenuation_db } => {
            data.attenuation = *attenuation_db;
            KIND_ATTENUATOR
        }
        NodeKind::Receiver => KIND_RECEIVER,
    };
    data.kind = Some(tag.to_string());
    NodeRecord {
        id: node.id.to_string(),
        kind: tag.to_string(),
        position: node.position.map(|p| PositionRecord { x: p.x, y: p.y }),
        data,
    }
}

fn link_to_record(link: &Link) -> EdgeRecord {
    EdgeRecord {
        id: link.id.to_string(),
        source: link.source.to_string(),
        target: link.target.to_string(),
        source_handle: link.source_handle.clone(),
        data: EdgeDataRecord {
            length: Some(link.length_m),
            loss_per_km: Some(link.loss_db_per_km),
            source_port: link.source_port.as_ref().map(PortName::to_string),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_core::InputLevel;
    use pon_topology::TopologyError;

    const SAMPLE: &str = r#"{
      "nodes": [
        { "id": "olt", "type": "OLT", "position": {"x": 0, "y": 0},
          "data": { "label": "OLT", "type": "OLT", "power": 3,
                    "inputSignal": null, "outputSignals": {"out": 3} } },
        { "id": "s1", "type": "SPLITTER_BALANCED",
          "data": { "label": "Splitter 1:8", "ratio": "1:8", "loss": 10.5 } },
        { "id": "s2", "type": "SPLITTER_UNBALANCED",
          "data": { "ratio": "5:95", "portLosses": {"out-95": 0.5, "out-5": 13.5} } },
        { "id": "a", "type": "ATTENUATOR", "data": { "attenuation": 0.5 } },
        { "id": "onu", "type": "ONU", "data": { "label": "ONU", "inputSignal": -7.25 } }
      ],
      "edges": [
        { "id": "e1", "source": "olt", "target": "s1", "sourceHandle": "out",
          "data": { "length": 1000, "lossPerKm": 0.35, "sourcePort": "out" } },
        { "id": "e2", "source": "s1", "target": "s2", "sourceHandle": "out-3" },
        { "id": "e3", "source": "s2", "target": "a",
          "data": { "length": 250, "sourcePort": "out-95" } },
        { "id": "e4", "source": "a", "target": "onu" }
      ]
    }"#;

    #[test]
    fn imports_every_kind() {
        let t = topology_from_str(SAMPLE).unwrap();
        assert_eq!(t.nodes().len(), 5);
        assert_eq!(t.node("olt").unwrap().kind, NodeKind::source(3.0));
        assert_eq!(t.node("olt").unwrap().position, Some(Position { x: 0.0, y: 0.0 }));
        assert_eq!(t.node("s1").unwrap().kind, NodeKind::balanced("1:8", 10.5));
        let NodeKind::SplitterUnbalanced { ratio, port_losses } = &t.node("s2").unwrap().kind
        else {
            panic!("expected unbalanced splitter");
        };
        assert_eq!(ratio.as_deref(), Some("5:95"));
        let ports: Vec<&str> = port_losses.keys().map(PortName::as_str).collect();
        assert_eq!(ports, ["out-95", "out-5"]);
        assert_eq!(t.node("a").unwrap().label, "a");
        assert!(t.node("onu").unwrap().kind.is_receiver());
    }

    #[test]
    fn computed_fields_are_discarded() {
        let t = topology_from_str(SAMPLE).unwrap();
        for node in t.nodes() {
            assert_eq!(node.levels.input, InputLevel::NoSignal);
            assert!(node.levels.outputs.is_empty());
        }
    }

    #[test]
    fn link_defaults_and_ports() {
        let t = topology_from_str(SAMPLE).unwrap();
        let e2 = t.link("e2").unwrap();
        assert_eq!(e2.length_m, 0.0);
        assert_eq!(e2.loss_db_per_km, 0.35);
        assert_eq!(e2.logical_port(), "out-3");
        let e3 = t.link("e3").unwrap();
        assert_eq!(e3.logical_port(), "out-95");
        assert_eq!(t.link("e4").unwrap().logical_port(), "out");
    }

    #[test]
    fn configured_fiber_loss_fills_gaps() {
        let cfg = EngineConfig {
            default_loss_db_per_km: 0.25,
            ..EngineConfig::default()
        };
        let t = load_topology_with(SAMPLE.as_bytes(), &cfg).unwrap();
        assert_eq!(t.link("e1").unwrap().loss_db_per_km, 0.35);
        assert_eq!(t.link("e3").unwrap().loss_db_per_km, 0.25);
    }

    #[test]
    fn links_alias_is_accepted() {
        let doc = r#"{"nodes":[{"id":"o","type":"OLT"},{"id":"r","type":"ONU"}],
                      "links":[{"id":"e","source":"o","target":"r"}]}"#;
        let t = topology_from_str(doc).unwrap();
        assert_eq!(t.links().len(), 1);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let doc = r#"{"nodes":[{"id":"x","type":"ROUTER"}],"edges":[]}"#;
        match topology_from_str(doc) {
            Err(ImportError::UnknownKind { node, kind }) => {
                assert_eq!(node, "x");
                assert_eq!(kind, "ROUTER");
            }
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let doc = r#"{"nodes":[{"id":"o","type":"OLT"}],
                      "edges":[{"id":"e","source":"o","target":"gone"}]}"#;
        match topology_from_str(doc) {
            Err(ImportError::Topology(TopologyError::DanglingLink { .. })) => {}
            other => panic!("expected DanglingLink, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            topology_from_str("{\"nodes\": [}"),
            Err(ImportError::Json(_))
        ));
        assert!(matches!(
            topology_from_str("{\"nodes\": [{\"type\": \"OLT\"}]}"),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn export_writes_levels_when_given() {
        let t = topology_from_str(SAMPLE).unwrap();
        let out = pon_engine::propagate(t.nodes(), t.links());
        let doc = to_document(&t, Some(&out));
        let olt = &doc.nodes[0];
        assert_eq!(olt.data.input_signal, None);
        assert_eq!(olt.data.output_signals.as_ref().unwrap()["out"], 3.0);
        // e2 leaves out-3 of a 1:8 splitter: valid, so the tap is reached.
        assert!(doc.nodes[2].data.input_signal.is_some());

        let bare = to_document(&t, None);
        assert!(bare.nodes.iter().all(|n| n.data.output_signals.is_none()));
    }

    #[test]
    fn export_uses_wire_field_names() {
        let t = topology_from_str(SAMPLE).unwrap();
        let json = topology_to_string(&t, None).unwrap();
        for key in ["\"edges\"", "\"portLosses\"", "\"lossPerKm\"", "\"sourcePort\"", "\"sourceHandle\""] {
            assert!(json.contains(key), "missing {key}");
        }
        assert!(!json.contains("\"links\""));
    }
}

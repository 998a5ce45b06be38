//! Serde records mirroring the JSON document layout.
//!
//! Every parameter is optional on the wire; defaults are applied when
//! records are converted to model types, not here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind tag of a source node.
pub const KIND_SOURCE: &str = "OLT";
/// Kind tag of a balanced splitter.
pub const KIND_SPLITTER_BALANCED: &str = "SPLITTER_BALANCED";
/// Kind tag of an unbalanced splitter.
pub const KIND_SPLITTER_UNBALANCED: &str = "SPLITTER_UNBALANCED";
/// Kind tag of an attenuator.
pub const KIND_ATTENUATOR: &str = "ATTENUATOR";
/// Kind tag of a receiver.
pub const KIND_RECEIVER: &str = "ONU";

/// A whole topology document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Nodes, in document order.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Links, in document order. Older documents call this `links`.
    #[serde(default, alias = "links")]
    pub edges: Vec<EdgeRecord>,
}

/// One node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id.
    pub id: String,
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Canvas placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRecord>,
    /// Parameters and computed levels.
    #[serde(default)]
    pub data: NodeDataRecord,
}

/// Canvas placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Node parameters. Which fields matter depends on the outer kind tag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataRecord {
    /// Display name; the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Duplicate of the outer tag in some documents. Ignored on import.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source launch power, dBm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Splitter ratio, `"1:N"` or `"tap:through"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    /// Balanced splitter insertion loss, dB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
    /// Unbalanced splitter loss per port, dB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_losses: Option<IndexMap<String, f64>>,
    /// Attenuator loss, dB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<f64>,
    /// Computed input level; `null` when unreached or a source.
    #[serde(default)]
    pub input_signal: Option<f64>,
    /// Computed output levels per port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_signals: Option<IndexMap<String, f64>>,
}

/// One link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// Link id.
    pub id: String,
    /// Upstream node id.
    pub source: String,
    /// Downstream node id.
    pub target: String,
    /// Visual connector id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Span parameters.
    #[serde(default)]
    pub data: EdgeDataRecord,
}

/// Link parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDataRecord {
    /// Span length, meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Fiber attenuation, dB/km.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_per_km: Option<f64>,
    /// Logical output port on the source node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
}

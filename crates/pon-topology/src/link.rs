//! Directed fiber spans between nodes.

use pon_core::{LinkId, NodeId, PortName, DEFAULT_LOSS_DB_PER_KM, DEFAULT_PORT};

/// A fiber span from one node's output port to another node's input.
///
/// The *logical* source port is what the engine looks up in the source
/// node's output levels. It is `source_port` when set, else the legacy
/// visual `source_handle`, else `"out"`. Empty strings count as unset.
///
/// # Examples
///
/// ```
/// use pon_topology::Link;
///
/// let link = Link::new("e1", "olt", "split").with_length(1000.0);
/// assert_eq!(link.logical_port(), "out");
/// assert!((link.cable_loss_db() - 0.35).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    /// Unique id.
    pub id: LinkId,
    /// Upstream node.
    pub source: NodeId,
    /// Downstream node.
    pub target: NodeId,
    /// Logical output port on `source`.
    pub source_port: Option<PortName>,
    /// Visual connector id from older documents.
    pub source_handle: Option<String>,
    /// Span length in meters.
    pub length_m: f64,
    /// Fiber attenuation in dB/km.
    pub loss_db_per_km: f64,
}

impl Link {
    /// A zero-length link from `source`'s `out` port at the default fiber loss.
    pub fn new(id: impl Into<LinkId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_port: None,
            source_handle: None,
            length_m: 0.0,
            loss_db_per_km: DEFAULT_LOSS_DB_PER_KM,
        }
    }

    /// Set the logical source port.
    pub fn with_port(mut self, port: impl Into<PortName>) -> Self {
        self.source_port = Some(port.into());
        self
    }

    /// Set the span length in meters.
    pub fn with_length(mut self, length_m: f64) -> Self {
        self.length_m = length_m;
        self
    }

    /// Set the fiber attenuation in dB/km.
    pub fn with_loss_rate(mut self, loss_db_per_km: f64) -> Self {
        self.loss_db_per_km = loss_db_per_km;
        self
    }

    /// The port name used to look up the upstream output level.
    pub fn logical_port(&self) -> &str {
        self.source_port
            .as_ref()
            .map(PortName::as_str)
            .filter(|p| !p.is_empty())
            .or_else(|| self.source_handle.as_deref().filter(|h| !h.is_empty()))
            .unwrap_or(DEFAULT_PORT)
    }

    /// Fiber loss over the span: `(length_m / 1000) * loss_db_per_km`.
    pub fn cable_loss_db(&self) -> f64 {
        (self.length_m / 1000.0) * self.loss_db_per_km
    }
}

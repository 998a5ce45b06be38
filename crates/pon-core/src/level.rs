//! Computed signal levels attached to every node by a propagation run.

use indexmap::IndexMap;

use crate::id::PortName;

/// Output power per logical port, in dBm.
///
/// Insertion-ordered so that reports and exported documents list ports
/// in the order the node kind produces them.
pub type OutputLevels = IndexMap<PortName, f64>;

/// The optical power arriving at a node's input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InputLevel {
    /// No signal reached this node in the last run.
    #[default]
    NoSignal,
    /// The node is a source and has no input.
    NotApplicable,
    /// Received power in dBm.
    Dbm(f64),
}

impl InputLevel {
    /// The received power, if the node has been reached.
    pub fn dbm(self) -> Option<f64> {
        match self {
            Self::Dbm(v) => Some(v),
            Self::NoSignal | Self::NotApplicable => None,
        }
    }

    /// `true` unless no signal reached the node.
    ///
    /// Sources count as reached: they produce the signal.
    pub fn is_reached(self) -> bool {
        !matches!(self, Self::NoSignal)
    }

    /// Bitwise equality, treating `-0.0`/`0.0` and NaN payloads as distinct.
    pub fn bits_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Dbm(a), Self::Dbm(b)) => a.to_bits() == b.to_bits(),
            (Self::NoSignal, Self::NoSignal) | (Self::NotApplicable, Self::NotApplicable) => true,
            _ => false,
        }
    }
}

/// The ephemeral fields a propagation run writes on a node.
///
/// Meaningless before the first run and stale after any edit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedLevels {
    /// Power arriving at the node's input.
    pub input: InputLevel,
    /// Power leaving each of the node's output ports.
    pub outputs: OutputLevels,
}

impl ComputedLevels {
    /// Levels of a node no signal has reached: input unset, no outputs.
    pub fn unreached() -> Self {
        Self::default()
    }

    /// Level at one output port, if the node produced it.
    pub fn output(&self, port: &str) -> Option<f64> {
        self.outputs.get(port).copied()
    }

    /// Bitwise equality of input and every output, port order included.
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.input.bits_eq(other.input)
            && self.outputs.len() == other.outputs.len()
            && self
                .outputs
                .iter()
                .zip(other.outputs.iter())
                .all(|((pa, va), (pb, vb))| pa == pb && va.to_bits() == vb.to_bits())
    }
}

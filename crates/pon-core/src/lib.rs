//! Core types for passive optical network modelling.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers and signal-level types shared by the topology model,
//! the propagation engine, and the document codec.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod level;

pub use id::{LinkId, NodeId, PortName};
pub use level::{ComputedLevels, InputLevel, OutputLevels};

/// Name of the single logical output port of sources and attenuators.
///
/// Balanced splitters also answer on this port as a legacy alias for
/// any one of their branches.
pub const DEFAULT_PORT: &str = "out";

/// Launch power of a source with no explicit setting, in dBm.
pub const DEFAULT_LAUNCH_POWER_DBM: f64 = 3.0;

/// Fiber attenuation of a link with no explicit rate, in dB/km.
pub const DEFAULT_LOSS_DB_PER_KM: f64 = 0.35;

/// Branch count of a balanced splitter whose ratio is absent or malformed.
pub const DEFAULT_SPLIT_COUNT: u32 = 2;

/// Insertion loss of a balanced splitter with no explicit loss, in dB.
pub const DEFAULT_SPLITTER_LOSS_DB: f64 = 3.5;

/// Receiver input level below which the link budget is not met, in dBm.
pub const DEFAULT_RECEIVER_SENSITIVITY_DBM: f64 = -25.0;

//! Topology model for passive optical distribution networks.
//!
//! This crate defines the entities the propagation engine consumes
//! ([`Node`], [`NodeKind`], [`Link`]), the [`Topology`] container with
//! the editor-facing mutations that keep it well-formed, and a
//! structural [`check`] that reports invariant violations without
//! refusing to hold them.
//!
//! # Node kinds
//!
//! - [`NodeKind::Source`]: optical line terminal, one `out` port
//! - [`NodeKind::SplitterBalanced`]: `1:N` splitter, ports `out-1 … out-N`
//! - [`NodeKind::SplitterUnbalanced`]: asymmetric tap, one port per loss entry
//! - [`NodeKind::Attenuator`]: inline loss, one `out` port
//! - [`NodeKind::Receiver`]: terminal, no outputs
//!
//! No loss arithmetic happens here; see `pon-engine`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod check;
pub mod error;
pub mod link;
pub mod node;
pub mod ports;
pub mod ratio;
pub mod topology;

pub use check::{check, has_errors, Severity, Violation, ViolationKind};
pub use error::TopologyError;
pub use link::Link;
pub use node::{Node, NodeKind, Position};
pub use ports::{accepts_port, default_port, output_ports, PortList};
pub use ratio::SplitRatio;
pub use topology::{outgoing_links, Topology};

//! JSON topology documents.
//!
//! Reads and writes the node/edge document the editor saves, converting
//! through serde wire records so the model crates stay serde-free.
//!
//! # Format
//!
//! ```text
//! { "nodes": [ { "id", "type", "position"?, "data": { ... } } ],
//!   "edges": [ { "id", "source", "target", "sourceHandle"?,
//!                "data": { "length"?, "lossPerKm"?, "sourcePort"? } } ] }
//! ```
//!
//! Node `type` is one of `OLT`, `SPLITTER_BALANCED`, `SPLITTER_UNBALANCED`,
//! `ATTENUATOR`, `ONU`. `edges` may also be spelled `links` on import.
//! Stored levels (`inputSignal`, `outputSignals`) are dropped on import
//! and written on export only when a propagation result is supplied.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod document;
pub mod error;
pub mod wire;

pub use document::{
    from_document, load_topology, load_topology_with, save_topology, to_document,
    topology_from_str, topology_to_string,
};
pub use error::ImportError;
pub use wire::DocumentRecord;

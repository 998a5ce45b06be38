//! pon: optical power budgets for passive optical distribution networks.
//!
//! This is the facade crate that re-exports the public API of the pon
//! sub-crates. Most users only need `pon` as a dependency.
//!
//! # Quick start
//!
//! ```rust
//! use pon::prelude::*;
//!
//! let mut net = Topology::new();
//! net.add_node(Node::new("olt", NodeKind::source(3.0))).unwrap();
//! net.add_node(Node::new("split", NodeKind::balanced("1:2", 3.5))).unwrap();
//! net.add_node(Node::new("onu", NodeKind::Receiver)).unwrap();
//! net.connect("olt", "split", "out", 1000.0).unwrap();
//! net.connect("split", "onu", "out-1", 0.0).unwrap();
//!
//! assert!(check(&net).is_empty());
//!
//! let levels = propagate(net.nodes(), net.links());
//! let onu = levels.iter().find(|n| n.id.as_str() == "onu").unwrap();
//! let dbm = onu.levels.input.dbm().unwrap();
//! assert!((dbm - (-0.85)).abs() < 1e-9);
//!
//! let report = assess(&EngineConfig::default(), &levels);
//! assert!(report.all_ok());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pon-core` | Ids, computed levels, default constants |
//! | [`topology`] | `pon-topology` | Nodes, links, mutations, checks, catalog |
//! | [`engine`] | `pon-engine` | Propagation, config, budget, diff |
//! | [`io`] | `pon-io` | JSON document import and export |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, computed levels, and default constants (`pon-core`).
pub use pon_core as types;

/// Network model, editor mutations, structural checks, and the component
/// catalog (`pon-topology`).
pub use pon_topology as topology;

/// Level propagation, engine configuration, link budget, and level diffs
/// (`pon-engine`).
pub use pon_engine as engine;

/// JSON topology documents (`pon-io`).
pub use pon_io as io;

/// Common imports for typical pon usage.
///
/// ```rust
/// use pon::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use pon_core::{ComputedLevels, InputLevel, LinkId, NodeId, PortName};

    // Model
    pub use pon_topology::{check, Link, Node, NodeKind, Severity, Topology, Violation};

    // Errors
    pub use pon_engine::ConfigError;
    pub use pon_io::ImportError;
    pub use pon_topology::TopologyError;

    // Engine
    pub use pon_engine::{assess, diff_levels, propagate, propagate_with, EngineConfig};

    // Documents
    pub use pon_io::{load_topology, save_topology};
}

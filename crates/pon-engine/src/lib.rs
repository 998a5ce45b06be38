//! Signal level propagation for passive optical networks.
//!
//! [`propagate`] walks a topology forward from its sources and attaches
//! an input level and per-port output levels to every node it reaches.
//! It never fails: absent parameters fall back to [`EngineConfig`]
//! defaults, links naming a port their source does not produce are
//! skipped, and a node no signal reaches keeps
//! [`InputLevel::NoSignal`](pon_core::InputLevel::NoSignal).
//!
//! Around the sweep:
//!
//! - [`budget::assess`] classifies receivers against a sensitivity threshold
//! - [`diff_levels`] reports which nodes' levels changed between two runs
//!
//! The engine holds no state between calls. Callers re-run it after
//! every accepted edit.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod budget;
pub mod config;
pub mod diff;
mod outputs;
pub mod propagate;

pub use budget::{assess, BudgetReport, BudgetStatus, ReceiverBudget};
pub use config::{ConfigError, EngineConfig};
pub use diff::{diff_levels, LevelChange, LevelDiff};
pub use propagate::{propagate, propagate_with, PropagationStats};

//! Per-kind output rule: input level in, output levels out.

use pon_core::{NodeId, OutputLevels, PortName};
use pon_topology::ratio::usable_branches;
use pon_topology::NodeKind;
use tracing::warn;

use crate::config::EngineConfig;

/// Output levels of a source, keyed `out`.
pub(crate) fn source_outputs(launch_power_dbm: Option<f64>, config: &EngineConfig) -> OutputLevels {
    let mut out = OutputLevels::with_capacity(1);
    out.insert(
        PortName::out(),
        launch_power_dbm.unwrap_or(config.default_launch_power_dbm),
    );
    out
}

/// Output levels of a node of `kind` whose input is `input_dbm`.
///
/// Never fails: absent parameters take the configured default, and a
/// malformed or oversized balanced ratio is read as
/// `default_split_count` branches.
pub(crate) fn output_levels(
    id: &NodeId,
    kind: &NodeKind,
    input_dbm: f64,
    config: &EngineConfig,
) -> OutputLevels {
    match kind {
        NodeKind::Source { launch_power_dbm } => source_outputs(*launch_power_dbm, config),
        NodeKind::Attenuator { attenuation_db } => {
            let mut out = OutputLevels::with_capacity(1);
            out.insert(PortName::out(), input_dbm - attenuation_db.unwrap_or(0.0));
            out
        }
        NodeKind::SplitterBalanced {
            ratio,
            insertion_loss_db,
        } => {
            let branches = balanced_branches(id, ratio.as_deref(), config);
            let level = input_dbm - insertion_loss_db.unwrap_or(config.default_splitter_loss_db);
            let mut out = OutputLevels::with_capacity(branches as usize + 1);
            for i in 1..=branches {
                out.insert(PortName::branch(i), level);
            }
            // Legacy alias for links drawn before ports were numbered.
            out.insert(PortName::out(), level);
            out
        }
        NodeKind::SplitterUnbalanced { port_losses, .. } => port_losses
            .iter()
            .map(|(port, loss)| (port.clone(), input_dbm - loss))
            .collect(),
        NodeKind::Receiver => OutputLevels::new(),
    }
}

fn balanced_branches(id: &NodeId, ratio: Option<&str>, config: &EngineConfig) -> u32 {
    let Some(ratio) = ratio else {
        return config.default_split_count;
    };
    usable_branches(ratio).unwrap_or_else(|| {
        warn!(
            node = %id,
            ratio,
            fallback = config.default_split_count,
            "unusable splitter ratio, using default branch count"
        );
        config.default_split_count
    })
}

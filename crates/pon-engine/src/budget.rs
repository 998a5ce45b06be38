//! Receiver link-budget report.

use std::fmt;

use pon_core::{InputLevel, NodeId};
use pon_topology::Node;

use crate::config::EngineConfig;

/// Whether a receiver's input meets the sensitivity threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BudgetStatus {
    /// Input at or above sensitivity.
    Ok,
    /// Input below sensitivity.
    BelowSensitivity,
    /// No signal reached the receiver.
    NoSignal,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::BelowSensitivity => "below sensitivity",
            Self::NoSignal => "no signal",
        })
    }
}

/// Budget of one receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiverBudget {
    /// Receiver id.
    pub id: NodeId,
    /// Receiver label.
    pub label: String,
    /// Input level, if reached.
    pub input_dbm: Option<f64>,
    /// `input_dbm - sensitivity`. Negative when below sensitivity.
    pub margin_db: Option<f64>,
    /// Classification.
    pub status: BudgetStatus,
}

/// Budget of every receiver in a propagated topology.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetReport {
    /// Threshold used, in dBm.
    pub sensitivity_dbm: f64,
    /// One entry per receiver, in node order.
    pub receivers: Vec<ReceiverBudget>,
}

impl BudgetReport {
    /// The reached receiver with the lowest input. Ties go to the first.
    pub fn weakest(&self) -> Option<&ReceiverBudget> {
        self.receivers
            .iter()
            .filter_map(|r| r.input_dbm.map(|dbm| (r, dbm)))
            .fold(None, |best: Option<(&ReceiverBudget, f64)>, (r, dbm)| match best {
                Some((_, b)) if b <= dbm => best,
                _ => Some((r, dbm)),
            })
            .map(|(r, _)| r)
    }

    /// Number of receivers with the given status.
    pub fn count(&self, status: BudgetStatus) -> usize {
        self.receivers.iter().filter(|r| r.status == status).count()
    }

    /// `true` if every receiver is [`BudgetStatus::Ok`].
    pub fn all_ok(&self) -> bool {
        self.receivers.iter().all(|r| r.status == BudgetStatus::Ok)
    }
}

/// Classify every receiver in `nodes` against `config.receiver_sensitivity_dbm`.
///
/// `nodes` should be the output of a propagation run.
pub fn assess(config: &EngineConfig, nodes: &[Node]) -> BudgetReport {
    let sensitivity = config.receiver_sensitivity_dbm;
    let receivers = nodes
        .iter()
        .filter(|n| n.kind.is_receiver())
        .map(|n| {
            let input_dbm = match n.levels.input {
                InputLevel::Dbm(v) => Some(v),
                InputLevel::NoSignal | InputLevel::NotApplicable => None,
            };
            let status = match input_dbm {
                None => BudgetStatus::NoSignal,
                Some(v) if v >= sensitivity => BudgetStatus::Ok,
                Some(_) => BudgetStatus::BelowSensitivity,
            };
            ReceiverBudget {
                id: n.id.clone(),
                label: n.label.clone(),
                input_dbm,
                margin_db: input_dbm.map(|v| v - sensitivity),
                status,
            }
        })
        .collect();
    BudgetReport {
        sensitivity_dbm: sensitivity,
        receivers,
    }
}

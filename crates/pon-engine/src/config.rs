//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] holds the values the engine substitutes for absent
//! node parameters, plus the receiver sensitivity used by the budget
//! report. [`validate()`](EngineConfig::validate) checks them once up
//! front so the propagation loop never has to.

use std::error::Error;
use std::fmt;

use pon_core::{
    DEFAULT_LAUNCH_POWER_DBM, DEFAULT_LOSS_DB_PER_KM, DEFAULT_RECEIVER_SENSITIVITY_DBM,
    DEFAULT_SPLITTER_LOSS_DB, DEFAULT_SPLIT_COUNT,
};
use pon_topology::SplitRatio;

const MAX_SPLIT_COUNT: u32 = SplitRatio::MAX_STANDARD;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric field is NaN or infinite.
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A loss field is negative.
    NegativeLoss {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// `default_split_count` is zero.
    ZeroSplitCount,
    /// `default_split_count` exceeds the largest standard splitter.
    SplitCountTooLarge(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            Self::NegativeLoss { field, value } => {
                write!(f, "{field} must be non-negative, got {value}")
            }
            Self::ZeroSplitCount => write!(f, "default_split_count must be at least 1"),
            Self::SplitCountTooLarge(n) => {
                write!(f, "default_split_count must be at most {MAX_SPLIT_COUNT}, got {n}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Fallback parameters and budget threshold for a propagation run.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Launch power for sources without one, in dBm. Default: 3.0.
    pub default_launch_power_dbm: f64,
    /// Fiber attenuation for imported links without one, in dB/km. Default: 0.35.
    pub default_loss_db_per_km: f64,
    /// Branch count for balanced splitters with a missing or malformed ratio. Default: 2.
    pub default_split_count: u32,
    /// Loss for balanced splitters without one, in dB. Default: 3.5.
    pub default_splitter_loss_db: f64,
    /// Minimum receiver input for the budget to be met, in dBm. Default: -25.0.
    pub receiver_sensitivity_dbm: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_launch_power_dbm: DEFAULT_LAUNCH_POWER_DBM,
            default_loss_db_per_km: DEFAULT_LOSS_DB_PER_KM,
            default_split_count: DEFAULT_SPLIT_COUNT,
            default_splitter_loss_db: DEFAULT_SPLITTER_LOSS_DB,
            receiver_sensitivity_dbm: DEFAULT_RECEIVER_SENSITIVITY_DBM,
        }
    }
}

impl EngineConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Every float finite.
        for (field, value) in [
            ("default_launch_power_dbm", self.default_launch_power_dbm),
            ("default_loss_db_per_km", self.default_loss_db_per_km),
            ("default_splitter_loss_db", self.default_splitter_loss_db),
            ("receiver_sensitivity_dbm", self.receiver_sensitivity_dbm),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        // 2. Losses non-negative.
        for (field, value) in [
            ("default_loss_db_per_km", self.default_loss_db_per_km),
            ("default_splitter_loss_db", self.default_splitter_loss_db),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeLoss { field, value });
            }
        }
        // 3. Between one and the largest standard branch count.
        if self.default_split_count == 0 {
            return Err(ConfigError::ZeroSplitCount);
        }
        if self.default_split_count > MAX_SPLIT_COUNT {
            return Err(ConfigError::SplitCountTooLarge(self.default_split_count));
        }
        Ok(())
    }
}

//! Streak protection and grace ledger.
//!
//! Every operation here is a pure transformation: the host passes in the
//! persisted inventory, break state and streak counters together with "now",
//! and persists whatever comes back as one atomic update.

mod evaluator;
mod inventory;
mod refill;
mod repair;
mod shield;
mod show_up;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use evaluator::{EvaluationInput, EvaluationOutcome, EvaluationStatus};
pub use inventory::{BreakState, ProtectionEvent, ProtectionInventory};
pub use refill::apply_weekly_free_refill;
pub use repair::{RepairOutcome, RepairRequest};
pub use shield::{maybe_award_weekly_shield, ShieldAward, ShieldAwardRequest};
pub use show_up::{ShowUpInput, ShowUpOutcome};

/// How long after a break a repair is still offered.
pub const REPAIR_WINDOW_MS: i64 = 48 * 60 * 60 * 1000;

/// Shields spent by one repair.
pub const REPAIR_SHIELD_COST: u32 = 2;

pub const DEFAULT_MAX_SHIELDS: u32 = 3;

/// Covered-streak interval at which a shield can be earned.
pub const SHIELD_EARN_INTERVAL_DAYS: u32 = 7;

/// Tunable ledger limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// Maximum shields a user can hold
    #[serde(default = "default_max_shields")]
    pub max_shields: u32,
    /// Repair window after a break (hours)
    #[serde(default = "default_repair_window_hours")]
    pub repair_window_hours: u32,
    /// Shields spent per repair
    #[serde(default = "default_repair_shield_cost")]
    pub repair_shield_cost: u32,
}

fn default_max_shields() -> u32 {
    DEFAULT_MAX_SHIELDS
}
fn default_repair_window_hours() -> u32 {
    (REPAIR_WINDOW_MS / (60 * 60 * 1000)) as u32
}
fn default_repair_shield_cost() -> u32 {
    REPAIR_SHIELD_COST
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            max_shields: default_max_shields(),
            repair_window_hours: default_repair_window_hours(),
            repair_shield_cost: default_repair_shield_cost(),
        }
    }
}

impl ProtectionConfig {
    pub fn repair_window_ms(&self) -> i64 {
        i64::from(self.repair_window_hours) * 60 * 60 * 1000
    }

    /// Reject limits that would make the ledger meaningless.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("max_shields", self.max_shields),
            ("repair_window_hours", self.repair_window_hours),
            ("repair_shield_cost", self.repair_shield_cost),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::NotPositive {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Entry point for ledger operations under one [`ProtectionConfig`].
///
/// Holds no ledger state of its own; every call takes the persisted values
/// and returns their successors.
#[derive(Debug, Clone, Default)]
pub struct GraceLedger {
    config: ProtectionConfig,
}

impl GraceLedger {
    /// Ledger with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProtectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtectionConfig {
        &self.config
    }
}

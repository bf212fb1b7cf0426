//! Persisted ledger values: token inventory, break state, and the
//! protection events handed to the UI.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Token inventory owned and persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionInventory {
    /// The single free freeze slot, refilled once per ISO week
    pub free_freeze_available: bool,

    /// Pro-only stackable shields, never above the configured maximum
    pub shields_available: u32,

    /// ISO week key of the last free refill
    #[serde(default)]
    pub last_free_refill_week_key: Option<String>,

    /// ISO week key of the last earned shield
    #[serde(default)]
    pub last_shield_earned_week_key: Option<String>,

    /// Local date key through which missed days have been evaluated
    #[serde(default)]
    pub last_evaluated_through_date_key: Option<String>,

    /// Most recent event, kept for late-joining observers
    #[serde(default)]
    pub last_event: Option<ProtectionEvent>,
}

impl Default for ProtectionInventory {
    fn default() -> Self {
        Self {
            free_freeze_available: true,
            shields_available: 0,
            last_free_refill_week_key: None,
            last_shield_earned_week_key: None,
            last_evaluated_through_date_key: None,
            last_event: None,
        }
    }
}

impl ProtectionInventory {
    /// Copy with the evaluation marker moved to `date_key`.
    pub(crate) fn evaluated_through(mut self, date_key: &str) -> Self {
        self.last_evaluated_through_date_key = Some(date_key.to_string());
        self
    }
}

/// Whether the streak is broken and until when it can be repaired.
///
/// Healthy when `broken_at_date_key` is `None`. When a break is recorded,
/// `eligible_repair_until_ms` is always set alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakState {
    /// First uncovered missed day
    #[serde(default)]
    pub broken_at_date_key: Option<String>,

    /// Streak length right before the break
    #[serde(default)]
    pub broken_streak_length: Option<u32>,

    /// Repair deadline, epoch milliseconds
    #[serde(default)]
    pub eligible_repair_until_ms: Option<i64>,

    /// When the last repair completed, epoch milliseconds
    #[serde(default)]
    pub repaired_at_ms: Option<i64>,
}

impl BreakState {
    /// Break recorded at `date_key` with a repair deadline.
    pub fn broken(date_key: &str, streak_length: u32, repair_until_ms: i64) -> Self {
        Self {
            broken_at_date_key: Some(date_key.to_string()),
            broken_streak_length: Some(streak_length),
            eligible_repair_until_ms: Some(repair_until_ms),
            repaired_at_ms: None,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken_at_date_key.is_some()
    }

    /// Whether the host may offer a repair at `now`.
    pub fn repair_available<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        match (self.is_broken(), self.eligible_repair_until_ms) {
            (true, Some(deadline)) => now.timestamp_millis() <= deadline,
            _ => false,
        }
    }
}

/// Protection outcome emitted for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtectionEvent {
    /// Missed days were covered by a free freeze and/or shields.
    FreezeUsed {
        id: String,
        at: DateTime<Utc>,
        days_covered: u32,
        free_used: u32,
        shields_used: u32,
    },
    /// A broken streak was restored by spending shields.
    StreakRepaired {
        id: String,
        at: DateTime<Utc>,
        restored_streak: u32,
        shields_spent: u32,
    },
}

impl ProtectionEvent {
    pub fn freeze_used(at: DateTime<Utc>, free_used: u32, shields_used: u32) -> Self {
        let days_covered = free_used + shields_used;
        let id = event_id(
            "freeze_used",
            &at,
            &[days_covered, free_used, shields_used],
        );
        ProtectionEvent::FreezeUsed {
            id,
            at,
            days_covered,
            free_used,
            shields_used,
        }
    }

    pub fn streak_repaired(at: DateTime<Utc>, restored_streak: u32, shields_spent: u32) -> Self {
        let id = event_id("streak_repaired", &at, &[restored_streak, shields_spent]);
        ProtectionEvent::StreakRepaired {
            id,
            at,
            restored_streak,
            shields_spent,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ProtectionEvent::FreezeUsed { id, .. } | ProtectionEvent::StreakRepaired { id, .. } => id,
        }
    }
}

/// Content-derived id: equal events always get equal ids.
fn event_id(kind: &str, at: &DateTime<Utc>, counters: &[u32]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(at.timestamp_millis().to_be_bytes());
    for counter in counters {
        hasher.update(counter.to_be_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    format!("pe_{}", &digest[..16])
}

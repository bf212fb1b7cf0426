//! Repairing a broken streak by spending shields.
//!
//! A repair restores the pre-break streak and treats every day through
//! yesterday as covered. It does not re-run missed-day evaluation: the
//! evaluation marker moves to yesterday, so the evaluator stays idle for the
//! rest of the day and resumes normally tomorrow.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use super::inventory::{BreakState, ProtectionEvent, ProtectionInventory};
use super::GraceLedger;
use crate::calendar::{add_local_days_key, local_date_key};
use crate::error::RepairError;

/// Input to [`GraceLedger::repair`].
#[derive(Debug, Clone)]
pub struct RepairRequest<'a, Tz: TimeZone> {
    pub now: &'a DateTime<Tz>,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
}

/// Ledger values after a successful repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    pub last_streak_date_key: Option<String>,
    pub current_streak: u32,
    pub current_covered_streak: u32,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
    pub event: ProtectionEvent,
}

impl GraceLedger {
    /// Spend the repair cost in shields to undo a recorded break.
    ///
    /// # Errors
    ///
    /// - [`RepairError::NotBroken`] when no break is recorded, including a
    ///   second repair of a break that was already repaired
    /// - [`RepairError::WindowExpired`] once `now` is past the deadline
    /// - [`RepairError::InsufficientShields`] when the inventory cannot pay
    pub fn repair<Tz: TimeZone>(
        &self,
        request: RepairRequest<'_, Tz>,
    ) -> Result<RepairOutcome, RepairError> {
        let RepairRequest {
            now,
            mut inventory,
            break_state,
        } = request;

        if !break_state.is_broken() {
            return Err(RepairError::NotBroken);
        }

        let now_ms = now.timestamp_millis();
        // A break without a deadline violates the ledger invariant; treat it as expired.
        let deadline_ms = break_state.eligible_repair_until_ms.unwrap_or(i64::MIN);
        if now_ms > deadline_ms {
            return Err(RepairError::WindowExpired { deadline_ms });
        }

        let cost = self.config.repair_shield_cost;
        if inventory.shields_available < cost {
            return Err(RepairError::InsufficientShields {
                available: inventory.shields_available,
                required: cost,
            });
        }

        let restored = break_state.broken_streak_length.unwrap_or(0);
        let yesterday = add_local_days_key(&local_date_key(now), -1);

        inventory.shields_available -= cost;
        let event = ProtectionEvent::streak_repaired(now.with_timezone(&Utc), restored, cost);
        inventory.last_event = Some(event.clone());
        if let Some(day) = &yesterday {
            inventory.last_evaluated_through_date_key = Some(day.clone());
        }

        info!(
            broken_at = ?break_state.broken_at_date_key,
            restored,
            shields_left = inventory.shields_available,
            "streak repaired"
        );
        Ok(RepairOutcome {
            last_streak_date_key: yesterday,
            current_streak: restored,
            current_covered_streak: restored,
            inventory,
            break_state: BreakState {
                repaired_at_ms: Some(now_ms),
                ..BreakState::default()
            },
            event,
        })
    }
}

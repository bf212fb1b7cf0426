//! Missed-day evaluation.
//!
//! Replays every local calendar day between the last covered day and
//! yesterday, spending one token per day (free freeze first, then shields)
//! until the gap is covered or the streak breaks on the first day nothing
//! is left to spend.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::inventory::{BreakState, ProtectionEvent, ProtectionInventory};
use super::refill::apply_weekly_free_refill;
use super::shield::{maybe_award_weekly_shield, ShieldAwardRequest};
use super::GraceLedger;
use crate::calendar::{add_local_days_key, diff_local_days, local_date_key};

/// Snapshot handed to [`GraceLedger::evaluate_missed_days`].
#[derive(Debug, Clone)]
pub struct EvaluationInput<'a, Tz: TimeZone> {
    pub now: &'a DateTime<Tz>,
    pub is_pro: bool,
    /// Last local day counted toward the streak (show-up or protected)
    pub last_streak_date_key: Option<String>,
    /// Last local day with an actual show-up
    pub last_show_up_date_key: Option<String>,
    /// Show-up based streak length
    pub current_streak: u32,
    /// Streak length including protected days
    pub current_covered_streak: u32,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
}

/// Which exit an evaluation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    /// Yesterday's key could not be derived from "now"
    InvalidNow,
    /// Already evaluated through yesterday
    AlreadyEvaluated,
    /// A break is recorded and waits for repair or a show-up
    AlreadyBroken,
    /// No streak or show-up history
    NoHistory,
    /// Nothing missed between the last covered day and yesterday
    NoGap,
    /// Every missed day was covered
    Covered,
    /// The streak broke partway through (or at the start of) the gap
    Broke,
}

/// New ledger values plus the counters the host uses to pick UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationOutcome {
    pub status: EvaluationStatus,
    pub last_streak_date_key: Option<String>,
    pub current_streak: u32,
    pub current_covered_streak: u32,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
    /// Event created by this call, if any token was spent
    pub event: Option<ProtectionEvent>,
    pub used_free: u32,
    pub used_shields: u32,
    pub covered_days: u32,
    pub shields_awarded: u32,
    pub broke: bool,
}

impl EvaluationOutcome {
    fn idle(
        status: EvaluationStatus,
        last_streak_date_key: Option<String>,
        current_streak: u32,
        current_covered_streak: u32,
        inventory: ProtectionInventory,
        break_state: BreakState,
    ) -> Self {
        debug!(?status, "missed-day evaluation skipped");
        Self {
            status,
            last_streak_date_key,
            current_streak,
            current_covered_streak,
            inventory,
            break_state,
            event: None,
            used_free: 0,
            used_shields: 0,
            covered_days: 0,
            shields_awarded: 0,
            broke: false,
        }
    }
}

impl GraceLedger {
    /// Cover missed days through yesterday, or record where the streak broke.
    ///
    /// Safe to call on every foreground: once the inventory is marked as
    /// evaluated through yesterday, further calls the same day spend nothing.
    pub fn evaluate_missed_days<Tz: TimeZone>(
        &self,
        input: EvaluationInput<'_, Tz>,
    ) -> EvaluationOutcome {
        let EvaluationInput {
            now,
            is_pro,
            last_streak_date_key,
            last_show_up_date_key,
            current_streak,
            mut current_covered_streak,
            inventory,
            break_state,
        } = input;

        let Some(yesterday) = add_local_days_key(&local_date_key(now), -1) else {
            return EvaluationOutcome::idle(
                EvaluationStatus::InvalidNow,
                last_streak_date_key,
                current_streak,
                current_covered_streak,
                inventory,
                break_state,
            );
        };

        let mut inventory = apply_weekly_free_refill(inventory, now);
        // The cap may have been lowered since these shields were earned.
        if inventory.shields_available > self.config.max_shields {
            debug!(
                shields = inventory.shields_available,
                max_shields = self.config.max_shields,
                "shields clamped to cap"
            );
            inventory.shields_available = self.config.max_shields;
        }

        if inventory.last_evaluated_through_date_key.as_deref() == Some(yesterday.as_str()) {
            return EvaluationOutcome::idle(
                EvaluationStatus::AlreadyEvaluated,
                last_streak_date_key,
                current_streak,
                current_covered_streak,
                inventory,
                break_state,
            );
        }

        if break_state.is_broken() {
            return EvaluationOutcome::idle(
                EvaluationStatus::AlreadyBroken,
                last_streak_date_key,
                current_streak,
                current_covered_streak,
                inventory.evaluated_through(&yesterday),
                break_state,
            );
        }

        let Some(last_covered) = last_streak_date_key
            .clone()
            .or_else(|| last_show_up_date_key.clone())
        else {
            return EvaluationOutcome::idle(
                EvaluationStatus::NoHistory,
                last_streak_date_key,
                current_streak,
                current_covered_streak,
                inventory.evaluated_through(&yesterday),
                break_state,
            );
        };

        let diff = match diff_local_days(&last_covered, &yesterday) {
            Some(diff) if diff > 0 => diff,
            _ => {
                return EvaluationOutcome::idle(
                    EvaluationStatus::NoGap,
                    last_streak_date_key.or(Some(last_covered)),
                    current_streak,
                    current_covered_streak,
                    inventory.evaluated_through(&yesterday),
                    break_state,
                );
            }
        };

        let now_utc = now.with_timezone(&Utc);
        let mut last_streak_date_key = last_streak_date_key;
        let mut used_free = 0u32;
        let mut used_shields = 0u32;
        let mut shields_awarded = 0u32;

        for step in 1..=diff {
            let Some(day) = add_local_days_key(&last_covered, step) else {
                break;
            };

            if inventory.free_freeze_available {
                inventory.free_freeze_available = false;
                used_free += 1;
                debug!(day = %day, "missed day covered by free freeze");
            } else if inventory.shields_available > 0 {
                inventory.shields_available -= 1;
                used_shields += 1;
                debug!(day = %day, shields_left = inventory.shields_available, "missed day covered by shield");
            } else {
                let covered_days = used_free + used_shields;
                let event = (covered_days > 0)
                    .then(|| ProtectionEvent::freeze_used(now_utc, used_free, used_shields));
                if let Some(event) = &event {
                    inventory.last_event = Some(event.clone());
                }
                let repair_until_ms = now.timestamp_millis() + self.config.repair_window_ms();

                info!(
                    broken_at = %day,
                    streak = current_streak,
                    covered_days,
                    repair_until_ms,
                    "streak broke, no protection left"
                );
                return EvaluationOutcome {
                    status: EvaluationStatus::Broke,
                    last_streak_date_key: None,
                    current_streak: 0,
                    current_covered_streak: 0,
                    inventory: inventory.evaluated_through(&yesterday),
                    break_state: BreakState::broken(&day, current_streak, repair_until_ms),
                    event,
                    used_free,
                    used_shields,
                    covered_days,
                    shields_awarded,
                    broke: true,
                };
            }

            current_covered_streak += 1;
            last_streak_date_key = Some(day);

            let award = maybe_award_weekly_shield(ShieldAwardRequest {
                now,
                is_pro,
                inventory,
                covered_streak: current_covered_streak,
                streak_is_broken: false,
                max_shields: self.config.max_shields,
            });
            inventory = award.inventory;
            if award.awarded {
                shields_awarded += 1;
            }
        }

        let covered_days = used_free + used_shields;
        let event = (covered_days > 0)
            .then(|| ProtectionEvent::freeze_used(now_utc, used_free, used_shields));
        if let Some(event) = &event {
            inventory.last_event = Some(event.clone());
        }

        info!(covered_days, used_free, used_shields, "missed days covered");
        EvaluationOutcome {
            status: EvaluationStatus::Covered,
            last_streak_date_key,
            current_streak,
            current_covered_streak,
            inventory: inventory.evaluated_through(&yesterday),
            break_state,
            event,
            used_free,
            used_shields,
            covered_days,
            shields_awarded,
            broke: false,
        }
    }
}

//! Recording an actual show-up.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::debug;

use super::inventory::{BreakState, ProtectionInventory};
use super::shield::{maybe_award_weekly_shield, ShieldAward, ShieldAwardRequest};
use super::GraceLedger;
use crate::calendar::{diff_local_days, local_date_key};

/// Input to [`GraceLedger::record_show_up`].
#[derive(Debug, Clone)]
pub struct ShowUpInput<'a, Tz: TimeZone> {
    pub now: &'a DateTime<Tz>,
    pub is_pro: bool,
    pub last_streak_date_key: Option<String>,
    pub last_show_up_date_key: Option<String>,
    pub current_streak: u32,
    pub current_covered_streak: u32,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowUpOutcome {
    /// False when today's show-up was already recorded
    pub counted: bool,
    pub last_streak_date_key: Option<String>,
    pub last_show_up_date_key: Option<String>,
    pub current_streak: u32,
    pub current_covered_streak: u32,
    pub inventory: ProtectionInventory,
    pub break_state: BreakState,
    pub shield_awarded: bool,
}

impl GraceLedger {
    /// Count today as a show-up.
    ///
    /// Extends the streak when yesterday was covered, restarts it otherwise,
    /// and clears any recorded break. Repeated calls on the same local day
    /// change nothing.
    pub fn record_show_up<Tz: TimeZone>(&self, input: ShowUpInput<'_, Tz>) -> ShowUpOutcome {
        let ShowUpInput {
            now,
            is_pro,
            last_streak_date_key,
            last_show_up_date_key,
            current_streak,
            current_covered_streak,
            inventory,
            break_state,
        } = input;

        let today = local_date_key(now);

        if last_show_up_date_key.as_deref() == Some(today.as_str()) {
            return ShowUpOutcome {
                counted: false,
                last_streak_date_key,
                last_show_up_date_key,
                current_streak,
                current_covered_streak,
                inventory,
                break_state,
                shield_awarded: false,
            };
        }

        let gap = last_streak_date_key
            .as_deref()
            .and_then(|last| diff_local_days(last, &today));

        let (streak, covered, break_state, advanced) = if break_state.is_broken() {
            debug!(broken_at = ?break_state.broken_at_date_key, "show-up clears break");
            let cleared = BreakState {
                repaired_at_ms: break_state.repaired_at_ms,
                ..BreakState::default()
            };
            (1, 1, cleared, true)
        } else {
            match gap {
                Some(1) => (current_streak + 1, current_covered_streak + 1, break_state, true),
                // Today was already covered by protection.
                Some(0) => (current_streak, current_covered_streak, break_state, false),
                _ => (1, 1, break_state, true),
            }
        };

        let award = if advanced {
            maybe_award_weekly_shield(ShieldAwardRequest {
                now,
                is_pro,
                inventory,
                covered_streak: covered,
                streak_is_broken: false,
                max_shields: self.config.max_shields,
            })
        } else {
            ShieldAward {
                inventory,
                awarded: false,
            }
        };

        ShowUpOutcome {
            counted: true,
            last_streak_date_key: Some(today.clone()),
            last_show_up_date_key: Some(today),
            current_streak: streak,
            current_covered_streak: covered,
            inventory: award.inventory,
            break_state,
            shield_awarded: award.awarded,
        }
    }
}

//! Weekly shield awards for Pro users.

use chrono::{DateTime, TimeZone};

use super::inventory::ProtectionInventory;
use super::SHIELD_EARN_INTERVAL_DAYS;
use crate::calendar::iso_week_key;

/// Input to [`maybe_award_weekly_shield`].
#[derive(Debug, Clone)]
pub struct ShieldAwardRequest<'a, Tz: TimeZone> {
    pub now: &'a DateTime<Tz>,
    pub is_pro: bool,
    pub inventory: ProtectionInventory,
    /// Covered streak length, counting protected days as well as show-ups
    pub covered_streak: u32,
    pub streak_is_broken: bool,
    pub max_shields: u32,
}

/// Result of [`maybe_award_weekly_shield`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldAward {
    pub inventory: ProtectionInventory,
    pub awarded: bool,
}

/// Grant one shield when the covered streak lands on a multiple of seven.
///
/// At most one shield per ISO week, Pro only, only while unbroken, and never
/// above `max_shields`.
pub fn maybe_award_weekly_shield<Tz: TimeZone>(request: ShieldAwardRequest<'_, Tz>) -> ShieldAward {
    let ShieldAwardRequest {
        now,
        is_pro,
        inventory,
        covered_streak,
        streak_is_broken,
        max_shields,
    } = request;

    let unchanged = |inventory| ShieldAward {
        inventory,
        awarded: false,
    };

    if !is_pro || streak_is_broken {
        return unchanged(inventory);
    }
    if covered_streak == 0 || covered_streak % SHIELD_EARN_INTERVAL_DAYS != 0 {
        return unchanged(inventory);
    }

    let current_week = iso_week_key(now);
    if inventory.last_shield_earned_week_key.as_deref() == Some(current_week.as_str()) {
        return unchanged(inventory);
    }
    if inventory.shields_available >= max_shields {
        return unchanged(inventory);
    }

    tracing::info!(
        week = %current_week,
        covered_streak,
        shields = inventory.shields_available + 1,
        "weekly shield earned"
    );
    ShieldAward {
        inventory: ProtectionInventory {
            shields_available: (inventory.shields_available + 1).min(max_shields),
            last_shield_earned_week_key: Some(current_week),
            ..inventory
        },
        awarded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protection::DEFAULT_MAX_SHIELDS;
    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-01-05T09:00:00+00:00").unwrap()
    }

    fn request(
        now: &DateTime<FixedOffset>,
        covered_streak: u32,
        inventory: ProtectionInventory,
    ) -> ShieldAwardRequest<'_, FixedOffset> {
        ShieldAwardRequest {
            now,
            is_pro: true,
            inventory,
            covered_streak,
            streak_is_broken: false,
            max_shields: DEFAULT_MAX_SHIELDS,
        }
    }

    #[test]
    fn test_award_on_day_seven() {
        let now = now();
        let award = maybe_award_weekly_shield(request(&now, 7, ProtectionInventory::default()));
        assert!(award.awarded);
        assert_eq!(award.inventory.shields_available, 1);
        assert_eq!(
            award.inventory.last_shield_earned_week_key.as_deref(),
            Some("2026-W02")
        );
    }

    #[test]
    fn test_no_award_between_multiples() {
        let now = now();
        for streak in 8..=13 {
            let award =
                maybe_award_weekly_shield(request(&now, streak, ProtectionInventory::default()));
            assert!(!award.awarded, "streak {streak} should not award");
        }
        let award = maybe_award_weekly_shield(request(&now, 0, ProtectionInventory::default()));
        assert!(!award.awarded);
    }

    #[test]
    fn test_day_fourteen_needs_a_new_week() {
        let now = now();
        let same_week = ProtectionInventory {
            shields_available: 1,
            last_shield_earned_week_key: Some("2026-W02".into()),
            ..Default::default()
        };
        let award = maybe_award_weekly_shield(request(&now, 14, same_week.clone()));
        assert!(!award.awarded);
        assert_eq!(award.inventory, same_week);

        let last_week = ProtectionInventory {
            last_shield_earned_week_key: Some("2026-W01".into()),
            ..same_week
        };
        let award = maybe_award_weekly_shield(request(&now, 14, last_week));
        assert!(award.awarded);
        assert_eq!(award.inventory.shields_available, 2);
    }

    #[test]
    fn test_free_users_never_earn() {
        let now = now();
        for streak in [7, 14, 21, 28] {
            let award = maybe_award_weekly_shield(ShieldAwardRequest {
                is_pro: false,
                ..request(&now, streak, ProtectionInventory::default())
            });
            assert!(!award.awarded);
            assert_eq!(award.inventory.shields_available, 0);
        }
    }

    #[test]
    fn test_broken_streak_never_earns() {
        let now = now();
        let award = maybe_award_weekly_shield(ShieldAwardRequest {
            streak_is_broken: true,
            ..request(&now, 7, ProtectionInventory::default())
        });
        assert!(!award.awarded);
    }

    #[test]
    fn test_cap_blocks_award() {
        let now = now();
        let full = ProtectionInventory {
            shields_available: DEFAULT_MAX_SHIELDS,
            ..Default::default()
        };
        let award = maybe_award_weekly_shield(request(&now, 21, full));
        assert!(!award.awarded);
        assert_eq!(award.inventory.shields_available, DEFAULT_MAX_SHIELDS);
        assert!(award.inventory.last_shield_earned_week_key.is_none());
    }
}

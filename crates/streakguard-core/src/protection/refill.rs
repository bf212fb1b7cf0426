//! Weekly free-freeze refill.

use chrono::{DateTime, TimeZone};

use super::inventory::ProtectionInventory;
use crate::calendar::iso_week_key;

/// Make the free freeze available again, once per ISO week.
///
/// Applies to every user regardless of entitlement. Calling it again within
/// the same week returns the inventory unchanged, even if the freeze was
/// spent in the meantime.
pub fn apply_weekly_free_refill<Tz: TimeZone>(
    inventory: ProtectionInventory,
    now: &DateTime<Tz>,
) -> ProtectionInventory {
    let current_week = iso_week_key(now);
    if inventory.last_free_refill_week_key.as_deref() == Some(current_week.as_str()) {
        return inventory;
    }

    tracing::debug!(week = %current_week, "refilling weekly free freeze");
    ProtectionInventory {
        free_freeze_available: true,
        last_free_refill_week_key: Some(current_week),
        ..inventory
    }
}

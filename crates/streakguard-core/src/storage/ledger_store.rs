//! JSON snapshot of one user's ledger, for hosts without their own store.
//!
//! The protection module never touches storage. This store is what the CLI
//! uses: load the snapshot, run one ledger operation, and replace the file
//! in a single write-then-rename so a crash never leaves half a state.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{CoreError, RepairError, StoreError};
use crate::protection::{
    BreakState, EvaluationInput, EvaluationOutcome, GraceLedger, ProtectionInventory,
    RepairOutcome, RepairRequest, ShowUpInput, ShowUpOutcome,
};

/// Everything the host persists for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub last_streak_date_key: Option<String>,
    #[serde(default)]
    pub last_show_up_date_key: Option<String>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub current_covered_streak: u32,
    #[serde(default)]
    pub inventory: ProtectionInventory,
    #[serde(default)]
    pub break_state: BreakState,
}

impl LedgerState {
    /// Run missed-day evaluation and apply the result.
    pub fn evaluate<Tz: TimeZone>(
        &mut self,
        ledger: &GraceLedger,
        now: &DateTime<Tz>,
    ) -> EvaluationOutcome {
        let outcome = ledger.evaluate_missed_days(EvaluationInput {
            now,
            is_pro: self.is_pro,
            last_streak_date_key: self.last_streak_date_key.clone(),
            last_show_up_date_key: self.last_show_up_date_key.clone(),
            current_streak: self.current_streak,
            current_covered_streak: self.current_covered_streak,
            inventory: self.inventory.clone(),
            break_state: self.break_state.clone(),
        });

        self.last_streak_date_key = outcome.last_streak_date_key.clone();
        self.current_streak = outcome.current_streak;
        self.current_covered_streak = outcome.current_covered_streak;
        self.inventory = outcome.inventory.clone();
        self.break_state = outcome.break_state.clone();
        outcome
    }

    /// Record a show-up and apply the result.
    ///
    /// Missed days before today are evaluated first, so a gap is covered
    /// (or the break recorded) before the show-up extends or restarts the
    /// streak.
    pub fn record_show_up<Tz: TimeZone>(
        &mut self,
        ledger: &GraceLedger,
        now: &DateTime<Tz>,
    ) -> ShowUpOutcome {
        let evaluation = self.evaluate(ledger, now);
        tracing::debug!(status = ?evaluation.status, "evaluated before show-up");

        let outcome = ledger.record_show_up(ShowUpInput {
            now,
            is_pro: self.is_pro,
            last_streak_date_key: self.last_streak_date_key.clone(),
            last_show_up_date_key: self.last_show_up_date_key.clone(),
            current_streak: self.current_streak,
            current_covered_streak: self.current_covered_streak,
            inventory: self.inventory.clone(),
            break_state: self.break_state.clone(),
        });

        self.last_streak_date_key = outcome.last_streak_date_key.clone();
        self.last_show_up_date_key = outcome.last_show_up_date_key.clone();
        self.current_streak = outcome.current_streak;
        self.current_covered_streak = outcome.current_covered_streak;
        self.inventory = outcome.inventory.clone();
        self.break_state = outcome.break_state.clone();
        outcome
    }

    /// Repair a recorded break. The state is untouched when refused.
    pub fn repair<Tz: TimeZone>(
        &mut self,
        ledger: &GraceLedger,
        now: &DateTime<Tz>,
    ) -> Result<RepairOutcome, RepairError> {
        let outcome = ledger.repair(RepairRequest {
            now,
            inventory: self.inventory.clone(),
            break_state: self.break_state.clone(),
        })?;

        self.last_streak_date_key = outcome.last_streak_date_key.clone();
        self.current_streak = outcome.current_streak;
        self.current_covered_streak = outcome.current_covered_streak;
        self.inventory = outcome.inventory.clone();
        self.break_state = outcome.break_state.clone();
        Ok(outcome)
    }
}

/// File-backed [`LedgerState`].
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Store at `<data_dir>/ledger.json`.
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self::at(data_dir()?.join("ledger.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or a fresh state if none was saved yet.
    pub fn load(&self) -> Result<LedgerState, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerState::default());
            }
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the snapshot atomically.
    pub fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        std::fs::write(&tmp, json).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;
        tracing::debug!(path = %self.path.display(), "ledger saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::at(dir.path().join("ledger.json"));
        assert_eq!(store.load().unwrap(), LedgerState::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::at(dir.path().join("ledger.json"));
        let ledger = GraceLedger::new();

        let mut state = LedgerState {
            is_pro: true,
            ..Default::default()
        };
        state.record_show_up(&ledger, &at("2026-01-01T09:00:00+00:00"));
        state.evaluate(&ledger, &at("2026-01-05T09:00:00+00:00"));
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
        assert!(!dir.path().join("ledger.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = LedgerStore::at(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_refused_repair_leaves_state_alone() {
        let mut state = LedgerState::default();
        let before = state.clone();
        let err = state
            .repair(&GraceLedger::new(), &at("2026-01-05T09:00:00+00:00"))
            .unwrap_err();
        assert_eq!(err, RepairError::NotBroken);
        assert_eq!(state, before);
    }

    #[test]
    fn test_show_up_after_gap_spends_free_freeze_first() {
        let ledger = GraceLedger::new();
        let mut state = LedgerState {
            last_streak_date_key: Some("2026-01-05".into()),
            last_show_up_date_key: Some("2026-01-05".into()),
            current_streak: 10,
            current_covered_streak: 10,
            ..Default::default()
        };

        // Jan 6 missed; the free freeze covers it and Jan 7 extends the streak.
        let out = state.record_show_up(&ledger, &at("2026-01-07T09:00:00+00:00"));
        assert!(out.counted);
        assert_eq!(state.current_streak, 11);
        assert_eq!(state.current_covered_streak, 12);
        assert!(!state.inventory.free_freeze_available);
        assert_eq!(state.last_streak_date_key.as_deref(), Some("2026-01-07"));
        assert_eq!(
            state.inventory.last_evaluated_through_date_key.as_deref(),
            Some("2026-01-06")
        );
    }

    #[test]
    fn test_show_up_after_uncovered_gap_clears_fresh_break() {
        let ledger = GraceLedger::new();
        let mut state = LedgerState {
            last_streak_date_key: Some("2026-01-05".into()),
            last_show_up_date_key: Some("2026-01-05".into()),
            current_streak: 10,
            current_covered_streak: 10,
            inventory: ProtectionInventory {
                free_freeze_available: false,
                last_free_refill_week_key: Some("2026-W02".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let out = state.record_show_up(&ledger, &at("2026-01-07T09:00:00+00:00"));
        assert!(out.counted);
        assert_eq!(state.current_streak, 1);
        assert!(!state.break_state.is_broken());
    }

    #[test]
    fn test_snapshot_uses_camel_case() {
        let json = serde_json::to_value(LedgerState::default()).unwrap();
        assert!(json.get("lastStreakDateKey").is_some());
        assert!(json.get("breakState").is_some());
        assert_eq!(json["inventory"]["shieldsAvailable"], 0);
    }
}

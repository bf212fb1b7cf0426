//! # Streakguard Core Library
//!
//! Streak protection and grace ledger for daily habit streaks. Decides, once
//! per local day, whether missed days are covered by protection tokens or
//! break the streak, and offers a time-boxed repair after a break.
//!
//! ## Architecture
//!
//! - **Calendar**: local `YYYY-MM-DD` day keys and ISO week keys
//! - **Protection**: pure ledger transforms (refill, shield awards, missed-day
//!   evaluation, repair, show-ups); callers pass "now" and the persisted state
//! - **Storage**: TOML configuration and a JSON ledger snapshot used by the CLI
//!
//! ## Key Components
//!
//! - [`GraceLedger`]: entry point for ledger operations
//! - [`ProtectionInventory`] / [`BreakState`]: persisted ledger values
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod protection;
pub mod storage;

pub use calendar::{
    add_local_days_key, diff_local_days, iso_week_key, local_date_key, parse_local_date_key,
};
pub use error::{ConfigError, CoreError, RepairError, StoreError, ValidationError};
pub use protection::{
    apply_weekly_free_refill, maybe_award_weekly_shield, BreakState, EvaluationInput,
    EvaluationOutcome, EvaluationStatus, GraceLedger, ProtectionConfig, ProtectionEvent,
    ProtectionInventory, RepairOutcome, RepairRequest, ShieldAward, ShieldAwardRequest,
    ShowUpInput, ShowUpOutcome, DEFAULT_MAX_SHIELDS, REPAIR_SHIELD_COST, REPAIR_WINDOW_MS,
};
pub use storage::{Config, LedgerState, LedgerStore};

use serde::Serialize;
use streakguard_core::error::Result;
use streakguard_core::{Config, GraceLedger, LedgerState, LedgerStore, StoreError};

use super::NowArg;

fn open() -> Result<(GraceLedger, LedgerStore, LedgerState)> {
    let config = Config::load()?;
    let store = LedgerStore::open()?;
    let state = store.load()?;
    tracing::debug!(path = %store.path().display(), is_pro = state.is_pro, "ledger loaded");
    Ok((GraceLedger::with_config(config.protection), store, state))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(StoreError::from)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    #[serde(flatten)]
    state: &'a LedgerState,
    repair_available: bool,
}

pub fn status(now: NowArg) -> Result<()> {
    let (_, _, state) = open()?;
    let now = now.resolve();
    print_json(&StatusView {
        repair_available: state.break_state.repair_available(&now),
        state: &state,
    })
}

pub fn evaluate(now: NowArg) -> Result<()> {
    let (ledger, store, mut state) = open()?;
    let outcome = state.evaluate(&ledger, &now.resolve());
    store.save(&state)?;
    print_json(&outcome)
}

/// Missed days are evaluated before the show-up is counted.
pub fn show_up(now: NowArg) -> Result<()> {
    let (ledger, store, mut state) = open()?;
    let outcome = state.record_show_up(&ledger, &now.resolve());
    store.save(&state)?;
    print_json(&outcome)
}

pub fn repair(now: NowArg) -> Result<()> {
    let (ledger, store, mut state) = open()?;
    let outcome = state.repair(&ledger, &now.resolve())?;
    store.save(&state)?;
    print_json(&outcome)
}

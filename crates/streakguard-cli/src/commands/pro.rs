use clap::Subcommand;
use streakguard_core::error::Result;
use streakguard_core::LedgerStore;

#[derive(Subcommand)]
pub enum ProAction {
    /// Enable Pro (shields can be earned)
    On,
    /// Disable Pro
    Off,
}

pub fn run(action: ProAction) -> Result<()> {
    let store = LedgerStore::open()?;
    let mut state = store.load()?;
    state.is_pro = matches!(action, ProAction::On);
    store.save(&state)?;
    println!("pro: {}", if state.is_pro { "on" } else { "off" });
    Ok(())
}

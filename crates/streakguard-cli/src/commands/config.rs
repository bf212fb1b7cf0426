use clap::Subcommand;
use streakguard_core::{Config, ConfigError};

/// Tunable ledger limits and what they control.
const LEDGER_KEYS: &[(&str, &str)] = &[
    (
        "protection.max_shields",
        "most shields a Pro user can hold; earning stops at this cap",
    ),
    (
        "protection.repair_window_hours",
        "hours after a break during which repair is offered",
    ),
    (
        "protection.repair_shield_cost",
        "shields spent by one repair",
    ),
];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one ledger limit
    Get {
        /// Dotted key, e.g. "protection.max_shields" (see `config keys`)
        key: String,
    },
    /// Change a ledger limit; values must be greater than zero
    Set {
        /// Dotted key, e.g. "protection.repair_window_hours"
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration as JSON
    List,
    /// Describe every ledger key with its current value
    Keys,
    /// Restore the default limits (3 shields, 48h window, repair costs 2)
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            tracing::info!(%key, %value, "ledger limit updated");
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Keys => {
            let config = Config::load()?;
            for (key, meaning) in LEDGER_KEYS {
                let current = config.get(key).unwrap_or_default();
                println!("{key} = {current}\n    {meaning}");
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

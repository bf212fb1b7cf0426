pub mod config;
pub mod ledger;
pub mod pro;

use chrono::{DateTime, FixedOffset, Local};
use clap::Args;

/// Clock override shared by ledger commands.
#[derive(Args, Debug, Clone)]
pub struct NowArg {
    /// Evaluate as of this RFC 3339 instant instead of the local clock
    #[arg(long, value_parser = parse_now)]
    pub now: Option<DateTime<FixedOffset>>,
}

impl NowArg {
    pub fn resolve(&self) -> DateTime<FixedOffset> {
        self.now.unwrap_or_else(|| Local::now().into())
    }
}

fn parse_now(input: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(input)
        .map_err(|e| format!("expected RFC 3339 time like 2026-01-05T09:00:00+09:00: {e}"))
}

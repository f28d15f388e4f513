//! Runtime configuration for the settlement binary.
//!
//! Everything is read from environment variables so the runner can be
//! dropped into a cron job or container without a flags parser.

use std::path::PathBuf;

pub const INPUT_VAR: &str = "FLEET_PAYOUT_INPUT";
pub const POLICY_VAR: &str = "FLEET_PAYOUT_POLICY";
pub const OUTPUT_VAR: &str = "FLEET_PAYOUT_OUTPUT";

const DEFAULT_INPUT: &str = "reports.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON document holding the reports to settle.
    pub input: PathBuf,
    /// Policy forced onto every fleet; each fleet keeps its own when unset.
    pub policy: Option<PathBuf>,
    /// Where to write the settled run; stdout when unset.
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            input: non_empty(INPUT_VAR)
                .unwrap_or_else(|| DEFAULT_INPUT.to_string())
                .into(),
            policy: non_empty(POLICY_VAR).map(PathBuf::from),
            output: non_empty(OUTPUT_VAR).map(PathBuf::from),
        }
    }
}

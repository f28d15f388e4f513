//! Payout policy: the corporation cut and the role weight table.
//!
//! Policies may be stored externally as JSON files, one per
//! corporation or payout scheme. This module loads them, much like the
//! fleet itself is handed to the engine by the persistence layer.

use crate::models::Corporation;
use crate::role::RoleWeights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// The corporation's standard cut of a fleet's net profit.
pub const DEFAULT_CORPORATION_CUT: f64 = 0.28;

fn default_corporation_cut() -> f64 {
    DEFAULT_CORPORATION_CUT
}

fn default_name() -> String {
    "default".to_string()
}

/// Constants a fleet's payout calculation depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutPolicy {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_corporation_cut")]
    pub corporation_cut: f64,
    #[serde(default)]
    pub role_weights: RoleWeights,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        Self {
            name: default_name(),
            corporation_cut: DEFAULT_CORPORATION_CUT,
            role_weights: RoleWeights::default(),
        }
    }
}

impl PayoutPolicy {
    /// Default weights with the cut taken from the given corporation.
    pub fn for_corporation(corporation: &Corporation) -> Self {
        Self {
            name: corporation.ticker.clone(),
            corporation_cut: corporation.corporation_cut,
            role_weights: RoleWeights::default(),
        }
    }
}

/// Load a single policy from a JSON file.
pub fn load_policy(path: &Path) -> Result<PayoutPolicy> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payout policy {}", path.display()))?;
    let policy = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse payout policy {}", path.display()))?;
    Ok(policy)
}

/// Load every `.json` policy in a directory, keyed by policy name.
///
/// Files that fail to parse are logged and skipped. Duplicate names are
/// not checked; the last file read wins.
pub fn load_policies_from_dir(path: &Path) -> Result<HashMap<String, PayoutPolicy>> {
    let mut policies = HashMap::new();
    if !path.is_dir() {
        return Ok(policies);
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file = entry.path();
        if file.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        match load_policy(&file) {
            Ok(policy) => {
                debug!(policy = %policy.name, file = %file.display(), "loaded payout policy");
                policies.insert(policy.name.clone(), policy);
            }
            Err(err) => warn!(file = %file.display(), "skipping payout policy: {err:#}"),
        }
    }
    Ok(policies)
}

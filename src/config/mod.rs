pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::RuleSet;

/// Persistent application configuration.
///
/// The rule set ships with compiled-in defaults; a config file on disk can
/// replace it, but rules never change mid-scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// The classification rules applied to every scan.
    pub rules: RuleSet,
    /// Whether excluded files are attached to the tree as marked leaves.
    pub show_excluded: bool,
    /// How many processed entries pass between scan progress events.
    pub progress_interval: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            show_excluded: false,
            progress_interval: 10,
        }
    }
}

//! Evaluation limits and diagnostics switches.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Nested pulls beyond this depth are abandoned with the category default.
    pub max_pull_depth: usize,
    /// Warn when a stateful node is pulled more than once in the same frame.
    pub report_repeated_pulls: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_pull_depth: 256,
            report_repeated_pulls: true,
        }
    }
}

//! Chain settings read from the `chain` section of the config file.

use serde::{Deserialize, Serialize};

use crate::prompt::DEFAULT_SYSTEM;

/// Knobs for prompt assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Character budget for the context block of the user prompt.
    pub max_context_chars: usize,
    /// System instruction sent with every question.
    pub system_prompt: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 8000,
            system_prompt: DEFAULT_SYSTEM.trim().to_string(),
        }
    }
}

//! Trie configuration section.
//!
//! Mirrors [`LanaiTrieConfig`] in a serializable form so it can be loaded from a
//! file or the environment.

use super::{ConfigResult, Validate};
use crate::data_structures::lanai_trie::LanaiTrieConfig;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for a configured key length ceiling.
pub const MAX_KEY_LEN_LIMIT: usize = 1 << 20;

/// Trie settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrieSettings {
    /// Longest key accepted by insert; unlimited when absent
    pub max_key_len: Option<usize>,

    /// Release spare child slots after a delete
    pub shrink_after_delete: bool,
}

impl Default for TrieSettings {
    fn default() -> Self {
        Self {
            max_key_len: None,
            shrink_after_delete: false,
        }
    }
}

impl Validate for TrieSettings {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(max) = self.max_key_len {
            if max == 0 || max > MAX_KEY_LEN_LIMIT {
                return Err(ConfigError::ValueOutOfRange {
                    key: "trie.max_key_len".to_string(),
                    message: format!("must be between 1 and {MAX_KEY_LEN_LIMIT}, got {max}"),
                });
            }
        }
        Ok(())
    }
}

impl From<&TrieSettings> for LanaiTrieConfig {
    fn from(settings: &TrieSettings) -> Self {
        let config = LanaiTrieConfig::new().with_shrink_after_delete(settings.shrink_after_delete);
        match settings.max_key_len {
            Some(max) => config.with_max_key_len(max),
            None => config,
        }
    }
}

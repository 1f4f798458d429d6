//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fold characters to lowercase in the dictionary and in scanned text
    pub case_insensitive: bool,
    /// Words edited per exclusive window during a partial rebuild
    pub batch_size: usize,
    /// Pause between partial rebuild batches, in microseconds
    pub batch_pause_us: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            batch_size: 50,
            batch_pause_us: 10,
        }
    }
}

impl EngineConfig {
    pub fn case_insensitive(case_insensitive: bool) -> Self {
        Self {
            case_insensitive,
            ..Self::default()
        }
    }

    /// Batch size, never zero
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_micros(self.batch_pause_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.case_insensitive);
        assert_eq!(config.effective_batch_size(), 50);
        assert_eq!(config.batch_pause(), Duration::from_micros(10));
    }

    #[test]
    fn test_zero_batch_size() {
        let config = EngineConfig {
            batch_size: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.effective_batch_size(), 1);
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"case_insensitive": true, "batch_size": 8}"#).unwrap();
        assert!(config.case_insensitive);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.batch_pause_us, 10);
    }
}

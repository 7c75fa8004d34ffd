use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Knobs for one battle, read from JSON by callers that keep them on disk.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BattleOptions {
    /// Fixed seed for deterministic replay. A random seed is drawn when absent.
    pub seed: Option<u64>,
    pub inverse_battle: bool,
    pub record_log: bool,
    pub format_id: String,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            seed: None,
            inverse_battle: false,
            record_log: false,
            format_id: "gen9customgame".to_string(),
        }
    }
}

impl BattleOptions {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse battle options")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read battle options from {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options = BattleOptions::from_json_str(r#"{ "seed": 12, "inverse_battle": true }"#).unwrap();
        assert_eq!(
            options,
            BattleOptions {
                seed: Some(12),
                inverse_battle: true,
                ..BattleOptions::default()
            }
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(BattleOptions::from_json_str("{ seed: 1 ").is_err());
        assert!(BattleOptions::from_json_file("/definitely/not/here.json").is_err());
    }
}

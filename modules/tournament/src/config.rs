use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TournamentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Swiss,
    /// Losers are dropped as soon as their match is reported.
    SingleElimination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwissConfig {
    pub format: Format,
    /// Defaults to ceil(log2(participants)) when unset.
    pub total_rounds: Option<u32>,
    pub max_pairing_attempts: u32,
    pub max_manual_restarts: u32,
    pub bye_games: u32,
    pub forfeit_games: u32,
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self {
            format: Format::Swiss,
            total_rounds: None,
            max_pairing_attempts: 1000,
            max_manual_restarts: 100,
            bye_games: 2,
            forfeit_games: 2,
        }
    }
}

impl SwissConfig {
    /// Load a config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, TournamentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, TournamentError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Round count for a field of `participants` entrants.
    pub fn rounds_for(&self, participants: usize) -> u32 {
        if let Some(rounds) = self.total_rounds {
            return rounds;
        }
        if participants <= 2 {
            return 1;
        }
        // ceil(log2(n)) for n >= 2
        usize::BITS - (participants - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_count_is_ceil_log2() {
        let config = SwissConfig::default();
        assert_eq!(config.rounds_for(1), 1);
        assert_eq!(config.rounds_for(2), 1);
        assert_eq!(config.rounds_for(3), 2);
        assert_eq!(config.rounds_for(8), 3);
        assert_eq!(config.rounds_for(9), 4);
        assert_eq!(config.rounds_for(32), 5);
    }

    #[test]
    fn test_explicit_round_count_wins() {
        let config = SwissConfig {
            total_rounds: Some(7),
            ..SwissConfig::default()
        };
        assert_eq!(config.rounds_for(4), 7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SwissConfig::from_json_str(r#"{ "format": "single_elimination", "bye_games": 1 }"#)
                .unwrap();
        assert_eq!(config.format, Format::SingleElimination);
        assert_eq!(config.bye_games, 1);
        assert_eq!(config.max_pairing_attempts, 1000);
        assert_eq!(config.total_rounds, None);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = SwissConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TournamentError::Config(_)));
    }
}

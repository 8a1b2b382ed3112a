use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::EnvError;

/// Reward-shaping magnitudes. All values are non-negative; the engine
/// decides the sign of each term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    /// Bonus for winning, penalty for losing.
    pub win_lose_value: f32,
    /// Cap on the loop penalty.
    pub max_loop_pun: f32,
    /// Bonus when the description or inventory is new.
    pub change_reward: f32,
    /// Penalty when the engine answers with a known bad-action response.
    pub useless_act_pun: f32,
    /// Bonus when the command's verb appears in an admissible command.
    pub verb_in_adm: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win_lose_value: 100.0,
            max_loop_pun: 5.0,
            change_reward: 1.0,
            useless_act_pun: 1.0,
            verb_in_adm: 1.0,
        }
    }
}

impl RewardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, EnvError> {
        let config: RewardConfig = serde_json::from_str(text)
            .map_err(|e| EnvError::Configuration(format!("reward config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EnvError::Configuration(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Build from `(key, value)` overrides on top of the defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "win_lose_value" => &mut config.win_lose_value,
                "max_loop_pun" => &mut config.max_loop_pun,
                "change_reward" => &mut config.change_reward,
                "useless_act_pun" => &mut config.useless_act_pun,
                "verb_in_adm" => &mut config.verb_in_adm,
                other => {
                    return Err(EnvError::Configuration(format!(
                        "unknown reward key {other:?}"
                    )));
                }
            };
            *slot = value;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EnvError> {
        let fields = [
            ("win_lose_value", self.win_lose_value),
            ("max_loop_pun", self.max_loop_pun),
            ("change_reward", self.change_reward),
            ("useless_act_pun", self.useless_act_pun),
            ("verb_in_adm", self.verb_in_adm),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(EnvError::Configuration(format!(
                    "{name} must be a non-negative magnitude, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = RewardConfig::from_json_str(r#"{"win_lose_value": 50}"#).unwrap();
        assert_eq!(config.win_lose_value, 50.0);
        assert_eq!(config.max_loop_pun, 5.0);
        assert_eq!(RewardConfig::from_json_str("{}").unwrap(), RewardConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = RewardConfig::from_json_str(r#"{"win_value": 50}"#).unwrap_err();
        assert!(matches!(err, EnvError::Configuration(_)));
        assert!(RewardConfig::from_pairs([("bogus", 1.0)]).is_err());
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        assert!(RewardConfig::from_json_str(r#"{"change_reward": -1}"#).is_err());
        assert!(RewardConfig::from_pairs([("max_loop_pun", f32::NAN)]).is_err());
    }

    #[test]
    fn pairs_override_defaults() {
        let config = RewardConfig::from_pairs([("verb_in_adm", 2.0), ("max_loop_pun", 3.0)]).unwrap();
        assert_eq!(config.verb_in_adm, 2.0);
        assert_eq!(config.max_loop_pun, 3.0);
        assert_eq!(config.win_lose_value, 100.0);
    }
}

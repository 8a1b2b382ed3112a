//! Python-facing entry points for `twgym`.
//!
//! Game states cross the language boundary as JSON objects, so the host
//! framework never has to mirror the Rust types.

use std::sync::Arc;

use twgym::{EnvError, GameState, RecentHistory, RewardConfig, RewardEngine, Vocabulary};

pub use twgym::{Action, translate};

#[cfg(feature = "python")]
mod python;

/// A reward engine bundled with the history it updates, for hosts that run
/// the game loop themselves.
#[derive(Debug, Clone)]
pub struct RewardSession {
    engine: RewardEngine,
    history: RecentHistory,
}

impl RewardSession {
    pub fn new(vocab: Arc<Vocabulary>, config: RewardConfig) -> Result<Self, EnvError> {
        config.validate()?;
        Ok(Self {
            engine: RewardEngine::new(config, vocab),
            history: RecentHistory::new(),
        })
    }

    /// Build from raw word lists and an optional JSON reward config.
    pub fn from_lists(
        verbs: Vec<String>,
        objects: Vec<String>,
        bad_actions: Vec<String>,
        config_json: Option<&str>,
    ) -> Result<Self, EnvError> {
        let config = match config_json {
            Some(text) => RewardConfig::from_json_str(text)?,
            None => RewardConfig::default(),
        };
        Self::new(Arc::new(Vocabulary::new(verbs, objects, bad_actions)?), config)
    }

    pub fn score(&mut self, old: &GameState, new: &GameState, command: &str) -> f32 {
        self.engine.compute(old, new, command, &mut self.history)
    }

    pub fn score_json(&mut self, old: &str, new: &str, command: &str) -> Result<f32, EnvError> {
        let old = GameState::from_json(old)?;
        let new = GameState::from_json(new)?;
        Ok(self.score(&old, &new, command))
    }

    /// Like [`RewardSession::score_json`] but returns every reward term as a
    /// JSON object.
    pub fn breakdown_json(&mut self, old: &str, new: &str, command: &str) -> Result<String, EnvError> {
        let old = GameState::from_json(old)?;
        let new = GameState::from_json(new)?;
        let breakdown = self
            .engine
            .compute_breakdown(&old, &new, command, &mut self.history);
        let mut value = serde_json::to_value(breakdown)
            .map_err(|e| EnvError::ContractViolation(format!("breakdown: {e}")))?;
        value["total"] = serde_json::json!(breakdown.total());
        Ok(value.to_string())
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        tracing::debug!("clearing reward history");
        self.history.clear();
    }
}

/// Turns index lists into commands against one vocabulary, in a fixed
/// action mode.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    vocab: Arc<Vocabulary>,
    flattened: bool,
}

impl CommandTranslator {
    pub fn new(vocab: Arc<Vocabulary>, flattened: bool) -> Self {
        Self { vocab, flattened }
    }

    pub fn from_lists(verbs: Vec<String>, objects: Vec<String>, flattened: bool) -> Result<Self, EnvError> {
        Ok(Self::new(Arc::new(Vocabulary::new(verbs, objects, vec![])?), flattened))
    }

    pub fn flattened(&self) -> bool {
        self.flattened
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    pub fn translate(&self, indices: &[usize]) -> Result<String, EnvError> {
        translate(action_from_indices(indices)?, &self.vocab, self.flattened)
    }
}

/// Interpret one index as a flat action and two as a `(verb, object)` pair.
pub fn action_from_indices(indices: &[usize]) -> Result<Action, EnvError> {
    match *indices {
        [i] => Ok(Action::Flat(i)),
        [v, o] => Ok(Action::Pair(v, o)),
        _ => Err(EnvError::InvalidAction(format!(
            "expected 1 or 2 indices, got {}",
            indices.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn state_json(score: i64, description: &str, won: bool) -> String {
        serde_json::json!({
            "score": score,
            "done": won,
            "won": won,
            "lost": false,
            "observation": "ok",
            "description": description,
            "inventory": "nothing",
            "admissible_commands": ["look"],
        })
        .to_string()
    }

    fn session() -> RewardSession {
        RewardSession::from_lists(words(&["take", "look"]), words(&["", "lamp"]), words(&["huh?"]), None)
            .unwrap()
    }

    #[test]
    fn scores_json_states() {
        let mut s = session();
        let reward = s
            .score_json(&state_json(5, "hall", false), &state_json(8, "attic", true), "take lamp")
            .unwrap();
        assert_eq!(reward, 104.0);
        assert_eq!(s.history().description().len(), 1);
        s.clear_history();
        assert!(s.history().description().is_empty());
    }

    #[test]
    fn breakdown_includes_total() {
        let mut s = session();
        let text = s
            .breakdown_json(&state_json(0, "hall", false), &state_json(0, "attic", false), "look")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["change"], 1.0);
        assert_eq!(value["admissible"], 1.0);
        assert_eq!(value["total"], 2.0);
    }

    #[test]
    fn malformed_state_is_rejected() {
        let mut s = session();
        let err = s.score_json("{}", &state_json(0, "hall", false), "look").unwrap_err();
        assert!(matches!(err, EnvError::ContractViolation(_)));
    }

    #[test]
    fn config_json_is_applied() {
        let mut s = RewardSession::from_lists(
            words(&["take"]),
            words(&[""]),
            vec![],
            Some(r#"{"win_lose_value": 1}"#),
        )
        .unwrap();
        let reward = s
            .score_json(&state_json(0, "hall", false), &state_json(0, "attic", true), "take")
            .unwrap();
        assert_eq!(reward, 2.0);
    }

    #[test]
    fn translator_keeps_its_mode() {
        let pairs = CommandTranslator::from_lists(words(&["take", "look"]), words(&["", "lamp"]), false).unwrap();
        assert_eq!(pairs.translate(&[0, 1]).unwrap(), "take lamp");
        assert_eq!(pairs.translate(&[1, 0]).unwrap(), "look");
        assert!(matches!(pairs.translate(&[3]), Err(EnvError::InvalidAction(_))));
        assert!(matches!(pairs.translate(&[2, 0]), Err(EnvError::IndexOutOfRange { .. })));

        let flat = CommandTranslator::new(Arc::clone(pairs.vocabulary()), true);
        assert!(flat.flattened());
        assert_eq!(flat.translate(&[1]).unwrap(), "take lamp");
        assert_eq!(flat.translate(&[2]).unwrap(), "look ");
        assert!(matches!(flat.translate(&[0, 1]), Err(EnvError::InvalidAction(_))));
        assert!(matches!(flat.translate(&[4]), Err(EnvError::IndexOutOfRange { .. })));
    }

    #[test]
    fn indices_pick_the_action_kind() {
        assert_eq!(action_from_indices(&[7]).unwrap(), Action::Flat(7));
        assert_eq!(action_from_indices(&[1, 0]).unwrap(), Action::Pair(1, 0));
        assert!(action_from_indices(&[]).is_err());
        assert!(action_from_indices(&[1, 2, 3]).is_err());
    }
}

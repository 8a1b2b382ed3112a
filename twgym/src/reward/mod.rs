//! Shaped reward for one text-game turn.
//!
//! The reward adds up five terms: the score delta, a penalty for responses
//! the game uses to reject nonsense, a novelty bonus or loop penalty driven
//! by [`RecentHistory`], a win/lose bonus, and a bonus for choosing a verb
//! the game currently accepts.

mod config;
pub mod history;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use config::RewardConfig;
pub use history::{Fingerprint, FingerprintRing, HISTORY_LEN, RecentHistory, RepeatCounts};

use crate::command::verb_of;
use crate::game::GameState;
use crate::vocab::Vocabulary;

/// The individual terms of one reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub score_delta: f32,
    pub bad_action: f32,
    /// Novelty bonus (positive) or loop penalty (negative).
    pub change: f32,
    pub terminal: f32,
    pub admissible: f32,
    pub repeats: Option<RepeatCounts>,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.score_delta + self.bad_action + self.change + self.terminal + self.admissible
    }
}

#[derive(Debug, Clone)]
pub struct RewardEngine {
    config: RewardConfig,
    vocab: Arc<Vocabulary>,
}

impl RewardEngine {
    pub fn new(config: RewardConfig, vocab: Arc<Vocabulary>) -> Self {
        Self { config, vocab }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for moving from `old` to `new` by issuing `command`.
    /// Records `new` in `history`.
    pub fn compute(
        &self,
        old: &GameState,
        new: &GameState,
        command: &str,
        history: &mut RecentHistory,
    ) -> f32 {
        self.compute_breakdown(old, new, command, history).total()
    }

    pub fn compute_breakdown(
        &self,
        old: &GameState,
        new: &GameState,
        command: &str,
        history: &mut RecentHistory,
    ) -> RewardBreakdown {
        let cfg = &self.config;
        let mut out = RewardBreakdown {
            score_delta: (new.score as f64 - old.score as f64) as f32,
            ..Default::default()
        };

        // at most one penalty, however many bad responses match
        if self.vocab.is_bad_response(&new.observation) {
            out.bad_action = -cfg.useless_act_pun;
        }

        let repeats = history.record(new);
        out.change = loop_term(repeats, cfg);
        out.repeats = Some(repeats);

        if new.won {
            out.terminal = cfg.win_lose_value;
        } else if new.lost {
            out.terminal = -cfg.win_lose_value;
        }

        let verb = verb_of(command);
        if new.admissible_commands.iter().any(|adm| adm.contains(verb)) {
            out.admissible = cfg.verb_in_adm;
        }

        tracing::debug!(
            command,
            total = out.total(),
            score_delta = out.score_delta,
            bad_action = out.bad_action,
            change = out.change,
            terminal = out.terminal,
            admissible = out.admissible,
            desc_repeats = repeats.description,
            inv_repeats = repeats.inventory,
            "computed reward"
        );
        out
    }
}

/// Novelty in either channel earns `change_reward`; repetition in both is
/// penalised by the smaller repeat count, capped at `max_loop_pun`.
fn loop_term(repeats: RepeatCounts, cfg: &RewardConfig) -> f32 {
    if repeats.inventory <= 1 || repeats.description <= 1 {
        cfg.change_reward
    } else {
        let inv = (repeats.inventory - 1) as f32;
        let desc = (repeats.description - 1) as f32;
        -inv.min(desc).min(cfg.max_loop_pun)
    }
}

//! The game engine interface and the per-turn state it reports.

use serde::{Deserialize, Serialize};

use crate::env::EnvError;

/// Command sent right after an engine reset so the first state carries a
/// populated description.
pub const LOOK_COMMAND: &str = "look";

/// One engine turn's snapshot. Built once per step and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: i64,
    pub done: bool,
    pub won: bool,
    pub lost: bool,
    /// Raw engine feedback for the issued command.
    pub observation: String,
    pub description: String,
    pub inventory: String,
    pub admissible_commands: Vec<String>,
}

impl GameState {
    /// Parse a state reported as JSON. Every field is required.
    pub fn from_json(text: &str) -> Result<Self, EnvError> {
        let state: GameState = serde_json::from_str(text)
            .map_err(|e| EnvError::ContractViolation(format!("malformed game state: {e}")))?;
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<(), EnvError> {
        if self.won && self.lost {
            return Err(EnvError::ContractViolation(
                "game state is both won and lost".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether this state ends the episode.
    pub fn is_terminal(&self) -> bool {
        self.done || self.won || self.lost
    }
}

/// A text-adventure engine driven one command at a time.
pub trait GameEngine: Send {
    fn reset(&mut self) -> Result<GameState, EnvError>;
    fn step(&mut self, command: &str) -> Result<GameState, EnvError>;

    fn close(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}

impl<G: GameEngine + ?Sized> GameEngine for Box<G> {
    fn reset(&mut self) -> Result<GameState, EnvError> {
        (**self).reset()
    }

    fn step(&mut self, command: &str) -> Result<GameState, EnvError> {
        (**self).step(command)
    }

    fn close(&mut self) -> Result<(), EnvError> {
        (**self).close()
    }
}

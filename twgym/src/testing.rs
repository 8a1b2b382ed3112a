//! A two-room scripted game used by the environment and rollout tests.

use std::sync::Arc;

use crate::env::EnvError;
use crate::game::{GameEngine, GameState};
use crate::vocab::Vocabulary;

pub(crate) const ROOMS: [&str; 2] = ["-= Hall =-", "-= Kitchen =-"];

pub(crate) fn vocab() -> Arc<Vocabulary> {
    let s = |l: &[&str]| l.iter().map(|w| w.to_string()).collect::<Vec<_>>();
    Arc::new(
        Vocabulary::new(
            s(&["go", "take", "open", "jump"]),
            s(&["", "north", "south", "lamp", "door"]),
            s(&["You can't", "I don't understand"]),
        )
        .unwrap(),
    )
}

#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    room: usize,
    has_lamp: bool,
    score: i64,
    pub resets: usize,
    pub log: Vec<String>,
    pub fail_next: bool,
    /// Answer the next command with a state that is both won and lost.
    pub corrupt_next: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, observation: &str, won: bool, lost: bool) -> GameState {
        let done = won || lost;
        let admissible = match (done, self.room) {
            (true, _) => vec![],
            (false, 0) => vec!["go north".to_string(), "jump".to_string()],
            (false, _) => {
                let mut cmds = vec!["go south".to_string()];
                if self.has_lamp {
                    cmds.push("open door".to_string());
                } else {
                    cmds.push("take lamp".to_string());
                }
                cmds
            }
        };
        GameState {
            score: self.score,
            done,
            won,
            lost,
            observation: observation.to_string(),
            description: ROOMS[self.room].to_string(),
            inventory: if self.has_lamp {
                "You are carrying a lamp.".to_string()
            } else {
                "You are empty-handed.".to_string()
            },
            admissible_commands: admissible,
        }
    }
}

impl GameEngine for MockEngine {
    fn reset(&mut self) -> Result<GameState, EnvError> {
        self.room = 0;
        self.has_lamp = false;
        self.score = 0;
        self.resets += 1;
        self.log.clear();
        Ok(self.state("Welcome!", false, false))
    }

    fn step(&mut self, command: &str) -> Result<GameState, EnvError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(EnvError::engine("engine crashed"));
        }
        self.log.push(command.to_string());
        if self.corrupt_next {
            self.corrupt_next = false;
            return Ok(self.state("Something went wrong.", true, true));
        }
        let state = match command {
            "look" => self.state(ROOMS[self.room], false, false),
            "go north" if self.room == 0 => {
                self.room = 1;
                self.state("You go north.", false, false)
            }
            "go south" if self.room == 1 => {
                self.room = 0;
                self.state("You go south.", false, false)
            }
            "take lamp" if self.room == 1 && !self.has_lamp => {
                self.has_lamp = true;
                self.score += 1;
                self.state("Taken.", false, false)
            }
            "open door" if self.room == 1 && self.has_lamp => {
                self.score += 10;
                self.state("You escape!", true, false)
            }
            "jump" => self.state("You fall into a pit.", false, true),
            _ => self.state("You can't do that.", false, false),
        };
        Ok(state)
    }
}

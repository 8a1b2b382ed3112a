pub mod command;
pub mod env;
pub mod game;
pub mod reward;
pub mod rollout;
pub mod tw_env;
pub mod vocab;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Action, translate, verb_of};
pub use env::{Env, EnvError, TextObservation, VecEnv};
pub use game::{GameEngine, GameState};
pub use reward::{RecentHistory, RewardBreakdown, RewardConfig, RewardEngine};
pub use tw_env::{EnvConfig, Environments, StepInfo, TwGameEnv, create_environments};
pub use vocab::Vocabulary;

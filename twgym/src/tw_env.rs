//! A text-adventure game exposed through the [`Env`] protocol.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::command::{Action, translate};
use crate::env::{ActionSpec, Env, EnvError, ObservationSpec, StepType, TextObservation};
use crate::game::{GameEngine, GameState, LOOK_COMMAND};
use crate::reward::{RecentHistory, RewardBreakdown, RewardConfig, RewardEngine};
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    pub game_path: PathBuf,
    pub verb_path: PathBuf,
    pub object_path: PathBuf,
    pub bad_action_path: PathBuf,
    /// Use one flat index over verb×object instead of a `(verb, object)` pair.
    #[serde(default)]
    pub flatten_actspec: bool,
    /// Trace every state and reward at debug level.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub reward: RewardConfig,
    /// Forget recent descriptions/inventories when a new episode starts.
    /// Off by default: the history spans episodes of one instance.
    #[serde(default)]
    pub reset_history_on_restart: bool,
    /// Episodes of random play used to check the training environment
    /// when `debug` is set.
    #[serde(default = "default_no_episodes")]
    pub no_episodes: usize,
}

fn default_no_episodes() -> usize {
    5
}

impl EnvConfig {
    pub fn from_json_str(text: &str) -> Result<Self, EnvError> {
        let config: EnvConfig = serde_json::from_str(text)
            .map_err(|e| EnvError::Configuration(format!("env config: {e}")))?;
        config.reward.validate()?;
        Ok(config)
    }

    pub fn load_vocabulary(&self) -> Result<Vocabulary, EnvError> {
        Vocabulary::from_paths(&self.verb_path, &self.object_path, &self.bad_action_path)
    }
}

/// Per-step details returned alongside the reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub step_type: StepType,
    pub discount: f32,
    /// Command sent to the engine; `None` for an automatic restart.
    pub command: Option<String>,
    pub score: i64,
    pub breakdown: Option<RewardBreakdown>,
}

pub struct TwGameEnv<G> {
    engine: G,
    vocab: Arc<Vocabulary>,
    reward: RewardEngine,
    history: RecentHistory,
    action_spec: ActionSpec,
    observation_spec: ObservationSpec,
    flatten_actspec: bool,
    debug: bool,
    reset_history_on_restart: bool,
    state: Option<GameState>,
    episode_ended: bool,
    closed: bool,
}

impl<G: GameEngine> TwGameEnv<G> {
    pub fn new(engine: G, vocab: Arc<Vocabulary>, config: &EnvConfig) -> Result<Self, EnvError> {
        config.reward.validate()?;
        let action_spec = if config.flatten_actspec {
            ActionSpec::flat(vocab.num_verbs(), vocab.num_objects())
        } else {
            ActionSpec::pair(vocab.num_verbs(), vocab.num_objects())
        };

        Ok(Self {
            engine,
            reward: RewardEngine::new(config.reward, Arc::clone(&vocab)),
            vocab,
            history: RecentHistory::new(),
            action_spec,
            observation_spec: ObservationSpec::default(),
            flatten_actspec: config.flatten_actspec,
            debug: config.debug,
            reset_history_on_restart: config.reset_history_on_restart,
            state: None,
            episode_ended: false,
            closed: false,
        })
    }

    pub fn action_spec(&self) -> ActionSpec {
        self.action_spec
    }

    pub fn observation_spec(&self) -> ObservationSpec {
        self.observation_spec
    }

    pub fn num_verbs(&self) -> usize {
        self.vocab.num_verbs()
    }

    pub fn num_objects(&self) -> usize {
        self.vocab.num_objects()
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn engine(&self) -> &G {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut G {
        &mut self.engine
    }

    /// Render `action` as the command this environment would send.
    pub fn command_for(&self, action: Action) -> Result<String, EnvError> {
        translate(action, &self.vocab, self.flatten_actspec)
    }

    fn start_game(&mut self) -> Result<TextObservation, EnvError> {
        tracing::info!("starting new game");
        self.engine.reset()?;
        let state = self.engine.step(LOOK_COMMAND)?;
        state.validate()?;
        if self.debug {
            tracing::debug!(?state, "initial state");
        }
        let obs = TextObservation::new(&state.description, &state.inventory);
        self.state = Some(state);
        Ok(obs)
    }
}

impl<G: GameEngine> Env for TwGameEnv<G> {
    type Obs = TextObservation;
    type Act = Action;
    type Info = StepInfo;

    fn reset(&mut self) -> Result<Self::Obs, EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if self.reset_history_on_restart {
            self.history.clear();
        }
        self.state = None;
        let obs = self.start_game()?;
        self.episode_ended = false;
        Ok(obs)
    }

    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if self.episode_ended {
            // the previous step ended the episode; this action is ignored
            tracing::warn!(?act, "episode over, restarting");
            let obs = self.reset()?;
            let score = self.state.as_ref().map_or(0, |s| s.score);
            let info = StepInfo {
                step_type: StepType::First,
                discount: 1.0,
                command: None,
                score,
                breakdown: None,
            };
            return Ok((obs, 0.0, false, info));
        }
        let Some(old_state) = self.state.as_ref() else {
            return Err(EnvError::ContractViolation(
                "step called before reset".to_string(),
            ));
        };

        self.action_spec.check(&act)?;
        let cmd = translate(act, &self.vocab, self.flatten_actspec)?;
        // the engine may have moved on, so a failed turn ends the episode
        let new_state = match self
            .engine
            .step(&cmd)
            .and_then(|state| state.validate().map(|()| state))
        {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(command = %cmd, error = %err, "turn failed, episode will restart");
                self.episode_ended = true;
                return Err(err);
            }
        };

        let breakdown =
            self.reward
                .compute_breakdown(old_state, &new_state, &cmd, &mut self.history);
        let reward = breakdown.total();

        if self.debug {
            tracing::debug!(state = ?new_state, reward, "stepped");
        }

        let done = new_state.is_terminal();
        self.episode_ended = done;
        let (step_type, discount) = if done {
            (StepType::Last, 0.0)
        } else {
            (StepType::Mid, 1.0)
        };

        let obs = TextObservation::new(&new_state.description, &new_state.inventory);
        let info = StepInfo {
            step_type,
            discount,
            command: Some(cmd),
            score: new_state.score,
            breakdown: Some(breakdown),
        };
        self.state = Some(new_state);
        Ok((obs, reward, done, info))
    }

    fn close(&mut self) -> Result<(), EnvError> {
        if !self.closed {
            self.closed = true;
            self.engine.close()?;
        }
        Ok(())
    }
}

/// A training environment, an optional evaluation environment sharing its
/// vocabulary, and the vocabulary sizes the policy needs.
pub struct Environments<G> {
    pub train: TwGameEnv<G>,
    pub eval: Option<TwGameEnv<G>>,
    pub num_verbs: usize,
    pub num_objects: usize,
}

/// Load the vocabulary once and build the environments from it.
/// `make_engine` is called with the game path once per environment.
pub fn create_environments<G, F>(
    config: &EnvConfig,
    make_engine: F,
    only_train: bool,
) -> Result<Environments<G>, EnvError>
where
    G: GameEngine,
    F: Fn(&Path) -> Result<G, EnvError>,
{
    let vocab = Arc::new(config.load_vocabulary()?);
    let mut train = TwGameEnv::new(make_engine(&config.game_path)?, Arc::clone(&vocab), config)?;
    if config.debug {
        validate_env(&mut train, config.no_episodes)?;
    }
    let eval = if only_train {
        None
    } else {
        Some(TwGameEnv::new(
            make_engine(&config.game_path)?,
            Arc::clone(&vocab),
            config,
        )?)
    };

    tracing::info!(
        game = %config.game_path.display(),
        flatten = config.flatten_actspec,
        eval = eval.is_some(),
        "created environments"
    );
    Ok(Environments {
        train,
        eval,
        num_verbs: vocab.num_verbs(),
        num_objects: vocab.num_objects(),
    })
}

/// Step cap per episode while validating, for games with no reachable end.
pub const VALIDATION_MAX_STEPS: usize = 100;

/// Play `episodes` episodes of uniformly random in-spec actions and check
/// that every observation fits the observation spec, every reward is finite
/// and terminal steps carry discount 0. The history cache is cleared
/// afterwards so validation play does not leak into training.
pub fn validate_env<G: GameEngine>(
    env: &mut TwGameEnv<G>,
    episodes: usize,
) -> Result<(), EnvError> {
    let mut rng = StdRng::seed_from_u64(0);
    let action_spec = env.action_spec();
    let observation_spec = env.observation_spec();
    let check_obs = |obs: &TextObservation, episode: usize| {
        if observation_spec.contains(obs) {
            Ok(())
        } else {
            Err(EnvError::ContractViolation(format!(
                "episode {episode}: observation does not fit {observation_spec:?}"
            )))
        }
    };

    for episode in 0..episodes {
        check_obs(&env.reset()?, episode)?;
        for _ in 0..VALIDATION_MAX_STEPS {
            let action = action_spec.sample(&mut rng);
            let (obs, reward, done, info) = env.step(action)?;
            check_obs(&obs, episode)?;
            if !reward.is_finite() {
                return Err(EnvError::ContractViolation(format!(
                    "episode {episode}: reward {reward} for {action:?}"
                )));
            }
            if done {
                if info.step_type != StepType::Last || info.discount != 0.0 {
                    return Err(EnvError::ContractViolation(format!(
                        "episode {episode}: terminal step reported as {:?} with discount {}",
                        info.step_type, info.discount
                    )));
                }
                break;
            }
        }
    }
    env.clear_history();
    tracing::info!(episodes, "environment validated");
    Ok(())
}

//! Driving environments with a policy and recording what happened.

use futures::future::join_all;
use serde::Serialize;

use crate::env::{Env, EnvError, Step, TrajectoryShard};

/// Anything that picks an action for an observation.
pub trait Policy<O, A> {
    fn act(&mut self, obs: &O) -> A;
}

impl<O, A, F> Policy<O, A> for F
where
    F: FnMut(&O) -> A,
{
    fn act(&mut self, obs: &O) -> A {
        self(obs)
    }
}

/// Reset `env` and play until the episode ends or `max_steps` actions have
/// been taken. Each recorded step pairs the observation the policy saw with
/// the action it chose and the resulting reward.
pub fn collect_episode<E, P>(
    env: &mut E,
    policy: &mut P,
    max_steps: usize,
) -> Result<TrajectoryShard<E::Obs, E::Act>, EnvError>
where
    E: Env,
    E::Info: Serialize,
    P: Policy<E::Obs, E::Act> + ?Sized,
{
    let mut shard = TrajectoryShard::new();
    let mut obs = env.reset()?;

    for _ in 0..max_steps {
        let act = policy.act(&obs);
        let (next_obs, rew, done, info) = env.step(act.clone())?;
        let info = serde_json::to_value(&info)
            .map_err(|e| EnvError::ContractViolation(format!("step info not serialisable: {e}")))?;
        shard.push(Step {
            obs,
            act,
            rew,
            done,
            info,
        });
        if done {
            break;
        }
        obs = next_obs;
    }

    tracing::debug!(
        id = %shard.id,
        steps = shard.len(),
        total_reward = shard.total_reward,
        finished = shard.finished(),
        "collected episode"
    );
    Ok(shard)
}

/// An environment and policy handed back after a parallel rollout, with the
/// episode they produced.
pub struct Rollout<E: Env, P> {
    pub env: E,
    pub policy: P,
    pub shard: TrajectoryShard<E::Obs, E::Act>,
}

/// Play one episode per `(env, policy)` pair, each on its own blocking task.
///
/// Workers share nothing mutable: every environment keeps its own history.
/// Results come back in input order; the first failure is returned.
pub async fn collect_parallel<E, P>(
    workers: Vec<(E, P)>,
    max_steps: usize,
) -> Result<Vec<Rollout<E, P>>, EnvError>
where
    E: Env + 'static,
    E::Info: Serialize,
    P: Policy<E::Obs, E::Act> + Send + 'static,
{
    let handles = workers.into_iter().map(|(mut env, mut policy)| {
        tokio::task::spawn_blocking(move || {
            let shard = collect_episode(&mut env, &mut policy, max_steps)?;
            Ok::<_, EnvError>(Rollout { env, policy, shard })
        })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(EnvError::engine).and_then(|r| r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Action;
    use crate::env::TextObservation;
    use crate::testing::{MockEngine, vocab};
    use crate::tw_env::{EnvConfig, TwGameEnv};

    fn env() -> TwGameEnv<MockEngine> {
        let config: EnvConfig = serde_json::from_str(
            r#"{"game_path": "two_rooms.ulx", "verb_path": "", "object_path": "", "bad_action_path": ""}"#,
        )
        .unwrap();
        TwGameEnv::new(MockEngine::new(), vocab(), &config).unwrap()
    }

    fn winning_script() -> impl FnMut(&TextObservation) -> Action + Send + 'static {
        let mut plan = vec![Action::Pair(0, 1), Action::Pair(1, 3), Action::Pair(2, 4)].into_iter();
        move |_obs: &TextObservation| plan.next().unwrap_or(Action::Pair(0, 0))
    }

    #[test]
    fn episode_stops_when_game_is_won() {
        let mut env = env();
        let shard = collect_episode(&mut env, &mut winning_script(), 50).unwrap();
        assert_eq!(shard.len(), 3);
        assert!(shard.finished());
        assert_eq!(shard.total_reward, 2.0 + 2.0 + 109.0);
        assert_eq!(shard.steps[0].obs.description, "-= Hall =-");
        assert_eq!(shard.steps[2].info["step_type"], "last");
        assert_eq!(shard.steps[2].info["command"], "open door");
    }

    #[test]
    fn episode_is_truncated_at_max_steps() {
        let mut env = env();
        let mut wander = |_: &TextObservation| Action::Pair(1, 1);
        let shard = collect_episode(&mut env, &mut wander, 4).unwrap();
        assert_eq!(shard.len(), 4);
        assert!(!shard.finished());
    }

    #[tokio::test]
    async fn parallel_workers_are_independent() {
        type Boxed = Box<dyn FnMut(&TextObservation) -> Action + Send>;
        let workers = vec![
            (env(), Box::new(winning_script()) as Boxed),
            (env(), Box::new(|_: &TextObservation| Action::Pair(3, 0)) as Boxed),
        ];
        let rollouts = collect_parallel(workers, 10).await.unwrap();
        assert_eq!(rollouts.len(), 2);
        assert_eq!(rollouts[0].shard.len(), 3);
        assert_eq!(rollouts[1].shard.len(), 1);
        assert!(rollouts.iter().all(|r| r.shard.finished()));
        assert_ne!(rollouts[0].shard.id, rollouts[1].shard.id);
        // each worker recorded only its own turns
        assert_eq!(rollouts[0].env.history().description().len(), 3);
        assert_eq!(rollouts[1].env.history().description().len(), 1);
    }
}

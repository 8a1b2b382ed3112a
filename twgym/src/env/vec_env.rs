use super::{Env, EnvError};

/// A batch of independent environments stepped in lockstep.
///
/// Each member keeps its own episode state; nothing is shared between them
/// except whatever read-only data they were built from.
pub struct VecEnv<E> {
    envs: Vec<E>,
}

impl<E: Env> VecEnv<E> {
    pub fn new<F>(make_env: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        let envs = (0..num_envs).map(|_| make_env()).collect();
        Self { envs }
    }

    /// Like [`VecEnv::new`] for constructors that can fail, e.g. ones that
    /// load vocabularies from disk.
    pub fn try_new<F>(make_env: F, num_envs: usize) -> Result<Self, EnvError>
    where
        F: Fn() -> Result<E, EnvError>,
    {
        let envs = (0..num_envs)
            .map(|_| make_env())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { envs })
    }

    pub fn from_envs(envs: Vec<E>) -> Self {
        Self { envs }
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn envs(&self) -> &[E] {
        &self.envs
    }

    pub fn into_envs(self) -> Vec<E> {
        self.envs
    }

    pub fn reset(&mut self) -> Result<Vec<E::Obs>, EnvError> {
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    pub fn step(
        &mut self,
        actions: Vec<E::Act>,
    ) -> Result<Vec<(E::Obs, f32, bool, E::Info)>, EnvError> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::ActionCountMismatch {
                actions: actions.len(),
                envs: self.envs.len(),
            });
        }

        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(env, action)| env.step(action))
            .collect()
    }

    pub fn close(&mut self) -> Result<(), EnvError> {
        for env in &mut self.envs {
            env.close()?;
        }
        Ok(())
    }
}

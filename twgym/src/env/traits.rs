use crate::env::errors::EnvError;

/// The step/reset protocol every environment speaks.
///
/// `step` returns `(observation, reward, done, info)`. Implementations own
/// all of their per-episode state, so independent instances can be driven
/// from different threads without any locking.
pub trait Env: Send {
    type Obs: Send + Clone + 'static;
    type Act: Send + Clone + 'static;
    type Info: Send + Clone + 'static;

    fn reset(&mut self) -> Result<Self::Obs, EnvError>;
    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError>;
    fn close(&mut self) -> Result<(), EnvError>;
}

// twgym/src/env/mod.rs
mod errors;
pub mod spec;
mod traits;
mod types;
mod vec_env;

pub use errors::{Axis, EnvError};
pub use spec::{ActionSpec, OBS_STR_LEN, ObservationSpec, TextObservation};
pub use traits::Env;
pub use types::{Step, StepType, TrajectoryShard};
pub use vec_env::VecEnv;

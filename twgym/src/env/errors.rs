use thiserror::Error;

/// Which vocabulary axis an action index addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Verb,
    Object,
    Flat,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Verb => write!(f, "verb"),
            Axis::Object => write!(f, "object"),
            Axis::Flat => write!(f, "flattened action"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Action count {actions} doesn't match environment count {envs}")]
    ActionCountMismatch { actions: usize, envs: usize },

    #[error("Environment is closed")]
    Closed,

    #[error("Engine error: {0}")]
    Engine(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl EnvError {
    pub fn engine<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        EnvError::Engine(err.into())
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step<O, A> {
    pub obs: O,
    pub act: A,
    pub rew: f32,
    pub done: bool,
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryShard<O, A> {
    pub id: String,
    pub steps: Vec<Step<O, A>>,
    pub total_reward: f32,
}

impl<O, A> TrajectoryShard<O, A> {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            steps: Vec::new(),
            total_reward: 0.0,
        }
    }

    pub fn push(&mut self, step: Step<O, A>) {
        self.total_reward += step.rew;
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when the last recorded step ended the episode.
    pub fn finished(&self) -> bool {
        self.steps.last().is_some_and(|s| s.done)
    }
}

impl<O, A> Default for TrajectoryShard<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a step within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    First,
    Mid,
    Last,
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::command::Action;
use crate::env::{Axis, EnvError};

/// Byte width of each observation string slot.
pub const OBS_STR_LEN: usize = 500;

/// Bounded action space, either one flat index or a `(verb, object)` pair.
/// Minimums are always zero; maximums are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionSpec {
    Flat { maximum: usize },
    Pair { maximum: [usize; 2] },
}

impl ActionSpec {
    pub fn flat(num_verbs: usize, num_objects: usize) -> Self {
        ActionSpec::Flat {
            maximum: (num_verbs * num_objects).saturating_sub(1),
        }
    }

    pub fn pair(num_verbs: usize, num_objects: usize) -> Self {
        ActionSpec::Pair {
            maximum: [num_verbs.saturating_sub(1), num_objects.saturating_sub(1)],
        }
    }

    pub fn shape(&self) -> &'static [usize] {
        match self {
            ActionSpec::Flat { .. } => &[],
            ActionSpec::Pair { .. } => &[2],
        }
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.check(action).is_ok()
    }

    /// Reject actions of the wrong kind or outside the bounds.
    pub fn check(&self, action: &Action) -> Result<(), EnvError> {
        let out_of_range = |axis, index: usize, maximum: usize| {
            if index > maximum {
                Err(EnvError::IndexOutOfRange {
                    axis,
                    index,
                    len: maximum + 1,
                })
            } else {
                Ok(())
            }
        };
        match (self, action) {
            (ActionSpec::Flat { maximum }, Action::Flat(i)) => out_of_range(Axis::Flat, *i, *maximum),
            (ActionSpec::Pair { maximum }, Action::Pair(v, o)) => {
                out_of_range(Axis::Verb, *v, maximum[0])?;
                out_of_range(Axis::Object, *o, maximum[1])
            }
            (ActionSpec::Flat { .. }, Action::Pair(..)) => Err(EnvError::InvalidAction(
                "verb/object pair given to a flattened action space".to_string(),
            )),
            (ActionSpec::Pair { .. }, Action::Flat(_)) => Err(EnvError::InvalidAction(
                "flat action given to an unflattened action space".to_string(),
            )),
        }
    }

    /// A uniformly drawn action inside the spec.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Action {
        match self {
            ActionSpec::Flat { maximum } => Action::Flat(rng.gen_range(0..=*maximum)),
            ActionSpec::Pair { maximum } => Action::Pair(
                rng.gen_range(0..=maximum[0]),
                rng.gen_range(0..=maximum[1]),
            ),
        }
    }

    /// Number of distinct actions in the space.
    pub fn size(&self) -> usize {
        match self {
            ActionSpec::Flat { maximum } => maximum + 1,
            ActionSpec::Pair { maximum } => (maximum[0] + 1) * (maximum[1] + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSpec {
    pub shape: [usize; 1],
    pub max_len: usize,
}

impl Default for ObservationSpec {
    fn default() -> Self {
        Self {
            shape: [2],
            max_len: OBS_STR_LEN,
        }
    }
}

impl ObservationSpec {
    pub fn contains(&self, obs: &TextObservation) -> bool {
        obs.description.len() <= self.max_len && obs.inventory.len() <= self.max_len
    }
}

/// What the agent sees each turn: the scene description and the inventory,
/// each clipped to [`OBS_STR_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObservation {
    pub description: String,
    pub inventory: String,
}

impl TextObservation {
    pub fn new(description: &str, inventory: &str) -> Self {
        Self {
            description: clip(description, OBS_STR_LEN).to_string(),
            inventory: clip(inventory, OBS_STR_LEN).to_string(),
        }
    }

    /// Fixed-shape, zero-padded byte rendering: row 0 is the description,
    /// row 1 the inventory.
    pub fn to_array(&self) -> [[u8; OBS_STR_LEN]; 2] {
        let mut out = [[0u8; OBS_STR_LEN]; 2];
        for (row, text) in out.iter_mut().zip([&self.description, &self.inventory]) {
            let bytes = clip(text, OBS_STR_LEN).as_bytes();
            row[..bytes.len()].copy_from_slice(bytes);
        }
        out
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a char.
fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_spec_covers_the_product() {
        let spec = ActionSpec::flat(3, 4);
        assert_eq!(spec, ActionSpec::Flat { maximum: 11 });
        assert_eq!(spec.size(), 12);
        assert!(spec.contains(&Action::Flat(11)));
        assert!(!spec.contains(&Action::Flat(12)));
        assert!(!spec.contains(&Action::Pair(0, 0)));
        assert!(spec.shape().is_empty());
    }

    #[test]
    fn pair_spec_bounds_each_axis() {
        let spec = ActionSpec::pair(3, 4);
        assert_eq!(spec.shape(), &[2]);
        assert!(spec.contains(&Action::Pair(2, 3)));
        assert!(!spec.contains(&Action::Pair(3, 0)));
        assert!(!spec.contains(&Action::Pair(0, 4)));
        assert!(!spec.contains(&Action::Flat(0)));
    }

    #[test]
    fn check_names_the_failing_axis() {
        let spec = ActionSpec::pair(3, 4);
        assert!(matches!(
            spec.check(&Action::Pair(0, 4)),
            Err(EnvError::IndexOutOfRange { axis: Axis::Object, index: 4, len: 4 })
        ));
        assert!(matches!(
            spec.check(&Action::Pair(5, 0)),
            Err(EnvError::IndexOutOfRange { axis: Axis::Verb, index: 5, len: 3 })
        ));
        assert!(matches!(spec.check(&Action::Flat(0)), Err(EnvError::InvalidAction(_))));
        assert!(matches!(
            ActionSpec::flat(3, 4).check(&Action::Flat(12)),
            Err(EnvError::IndexOutOfRange { axis: Axis::Flat, index: 12, len: 12 })
        ));
    }

    #[test]
    fn samples_stay_inside_the_spec() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for spec in [ActionSpec::flat(3, 4), ActionSpec::pair(3, 4)] {
            for _ in 0..200 {
                assert!(spec.contains(&spec.sample(&mut rng)));
            }
        }
    }

    #[test]
    fn observation_is_clipped_on_char_boundary() {
        let long = "é".repeat(400); // 800 bytes
        let obs = TextObservation::new(&long, "a lamp");
        assert!(obs.description.len() <= OBS_STR_LEN);
        assert_eq!(obs.description.len(), 500);
        assert!(ObservationSpec::default().contains(&obs));

        let odd = format!("x{}", "é".repeat(400));
        let obs = TextObservation::new(&odd, "");
        assert_eq!(obs.description.len(), 499);
    }

    #[test]
    fn array_rows_are_zero_padded() {
        let obs = TextObservation::new("kitchen", "nothing");
        let arr = obs.to_array();
        assert_eq!(&arr[0][..7], b"kitchen");
        assert!(arr[0][7..].iter().all(|b| *b == 0));
        assert_eq!(&arr[1][..7], b"nothing");
    }
}

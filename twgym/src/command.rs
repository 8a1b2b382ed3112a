//! Turning agent actions into game commands.

use serde::{Deserialize, Serialize};

use crate::env::{Axis, EnvError};
use crate::vocab::Vocabulary;

/// An agent action: one index into the flattened verb×object space, or a
/// `(verb, object)` index pair. Object 0 means "no object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Flat(usize),
    Pair(usize, usize),
}

/// Render `action` as a command string.
///
/// Flattened indices enumerate verbs major, objects minor, so index `i`
/// names `verbs[i / |objects|]` and `objects[i % |objects|]`. A pair whose
/// object is 0 renders as the bare verb with no trailing space.
pub fn translate(action: Action, vocab: &Vocabulary, flattened: bool) -> Result<String, EnvError> {
    let verbs = vocab.verbs();
    let objects = vocab.objects();

    let cmd = match (action, flattened) {
        (Action::Flat(i), true) => {
            let len = vocab.num_flat_actions();
            if i >= len {
                return Err(EnvError::IndexOutOfRange {
                    axis: Axis::Flat,
                    index: i,
                    len,
                });
            }
            let n = objects.len();
            format!("{} {}", verbs[i / n], objects[i % n])
        }
        (Action::Pair(v, o), false) => {
            let verb = verbs.get(v).ok_or(EnvError::IndexOutOfRange {
                axis: Axis::Verb,
                index: v,
                len: verbs.len(),
            })?;
            let object = objects.get(o).ok_or(EnvError::IndexOutOfRange {
                axis: Axis::Object,
                index: o,
                len: objects.len(),
            })?;
            if o == 0 {
                verb.clone()
            } else {
                format!("{verb} {object}")
            }
        }
        (Action::Flat(_), false) => {
            return Err(EnvError::InvalidAction(
                "flat action given to an unflattened action space".to_string(),
            ));
        }
        (Action::Pair(..), true) => {
            return Err(EnvError::InvalidAction(
                "verb/object pair given to a flattened action space".to_string(),
            ));
        }
    };

    tracing::debug!(?action, command = %cmd, "translated action");
    Ok(cmd)
}

/// The verb token of a command: everything before the first space.
///
/// Verbs never contain spaces, which the vocabulary enforces on load.
pub fn verb_of(command: &str) -> &str {
    command.split_once(' ').map_or(command, |(verb, _)| verb)
}

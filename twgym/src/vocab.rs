//! Verb, object and bad-response word lists.
//!
//! Every list is line-delimited with one token per line. Object index 0 is
//! reserved for "no object" and may be blank.

use std::path::Path;

use crate::env::EnvError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    verbs: Vec<String>,
    objects: Vec<String>,
    bad_actions: Vec<String>,
}

impl Vocabulary {
    pub fn new(
        verbs: Vec<String>,
        objects: Vec<String>,
        bad_actions: Vec<String>,
    ) -> Result<Self, EnvError> {
        if verbs.is_empty() {
            return Err(EnvError::Configuration("verb list is empty".to_string()));
        }
        if objects.is_empty() {
            return Err(EnvError::Configuration(
                "object list is empty; index 0 must hold the \"no object\" entry".to_string(),
            ));
        }
        for (i, verb) in verbs.iter().enumerate() {
            if verb.is_empty() {
                return Err(EnvError::Configuration(format!("verb {i} is blank")));
            }
            if verb.contains(char::is_whitespace) {
                return Err(EnvError::Configuration(format!(
                    "verb {i} ({verb:?}) contains whitespace"
                )));
            }
        }
        if let Some(i) = objects.iter().skip(1).position(String::is_empty) {
            return Err(EnvError::Configuration(format!("object {} is blank", i + 1)));
        }
        if let Some(i) = bad_actions.iter().position(String::is_empty) {
            return Err(EnvError::Configuration(format!(
                "bad-action entry {i} is blank and would match every response"
            )));
        }

        Ok(Self {
            verbs,
            objects,
            bad_actions,
        })
    }

    pub fn from_paths(
        verb_path: impl AsRef<Path>,
        object_path: impl AsRef<Path>,
        bad_action_path: impl AsRef<Path>,
    ) -> Result<Self, EnvError> {
        let vocab = Self::new(
            read_words(verb_path.as_ref())?,
            read_words(object_path.as_ref())?,
            read_words(bad_action_path.as_ref())?,
        )?;
        tracing::info!(
            verbs = vocab.num_verbs(),
            objects = vocab.num_objects(),
            bad_actions = vocab.bad_actions.len(),
            "loaded vocabulary"
        );
        Ok(vocab)
    }

    pub fn verbs(&self) -> &[String] {
        &self.verbs
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn bad_actions(&self) -> &[String] {
        &self.bad_actions
    }

    pub fn num_verbs(&self) -> usize {
        self.verbs.len()
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn num_flat_actions(&self) -> usize {
        self.verbs.len() * self.objects.len()
    }

    /// True if any known bad-action response occurs in `response`.
    pub fn is_bad_response(&self, response: &str) -> bool {
        self.bad_actions.iter().any(|bad| response.contains(bad.as_str()))
    }
}

/// Split `text` into trimmed tokens, one per line.
pub fn parse_words(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}

fn read_words(path: &Path) -> Result<Vec<String>, EnvError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| EnvError::Configuration(format!("reading {}: {e}", path.display())))?;
    Ok(parse_words(&text))
}

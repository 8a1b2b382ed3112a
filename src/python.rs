use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use twgym::EnvError;

use crate::{CommandTranslator, RewardSession};

fn to_py_err(err: EnvError) -> PyErr {
    match &err {
        EnvError::IndexOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
        EnvError::InvalidAction(_)
        | EnvError::Configuration(_)
        | EnvError::ContractViolation(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Render an action as a game command. One index is a flattened action,
/// two are a (verb, object) pair; the kind must match `flattened`.
#[pyfunction]
#[pyo3(signature = (verbs, objects, action, flattened=false))]
fn translate_action(
    verbs: Vec<String>,
    objects: Vec<String>,
    action: Vec<usize>,
    flattened: bool,
) -> PyResult<String> {
    CommandTranslator::from_lists(verbs, objects, flattened)
        .and_then(|t| t.translate(&action))
        .map_err(to_py_err)
}

/// Holds the vocabulary so repeated translations skip reloading it.
#[pyclass(name = "Translator")]
struct PyTranslator {
    inner: CommandTranslator,
}

#[pymethods]
impl PyTranslator {
    #[new]
    #[pyo3(signature = (verbs, objects, flattened=false))]
    fn new(verbs: Vec<String>, objects: Vec<String>, flattened: bool) -> PyResult<Self> {
        let inner = CommandTranslator::from_lists(verbs, objects, flattened).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn flattened(&self) -> bool {
        self.inner.flattened()
    }

    fn translate(&self, action: Vec<usize>) -> PyResult<String> {
        self.inner.translate(&action).map_err(to_py_err)
    }
}

/// Shaped reward with its own recent-history cache. States are JSON objects.
#[pyclass(name = "RewardEngine")]
struct PyRewardEngine {
    inner: RewardSession,
}

#[pymethods]
impl PyRewardEngine {
    #[new]
    #[pyo3(signature = (verbs, objects, bad_actions, config_json=None))]
    fn new(
        verbs: Vec<String>,
        objects: Vec<String>,
        bad_actions: Vec<String>,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let inner = RewardSession::from_lists(verbs, objects, bad_actions, config_json)
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn compute(&mut self, old_state: &str, new_state: &str, command: &str) -> PyResult<f32> {
        self.inner
            .score_json(old_state, new_state, command)
            .map_err(to_py_err)
    }

    /// Same as `compute` but returns each reward term as a JSON string.
    fn breakdown(&mut self, old_state: &str, new_state: &str, command: &str) -> PyResult<String> {
        self.inner
            .breakdown_json(old_state, new_state, command)
            .map_err(to_py_err)
    }

    fn clear_history(&mut self) {
        self.inner.clear_history();
    }
}

/// The name of this function must match the lib.name in Cargo.toml
#[pymodule]
fn twgym_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(translate_action, m)?)?;
    m.add_class::<PyRewardEngine>()?;
    m.add_class::<PyTranslator>()?;
    Ok(())
}

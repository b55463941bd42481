use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::action::Action;
use crate::config::{ActionSpaceKind, Config, ConfigError};
use crate::env::{Env, EnvError, KinematicWorld, PursuitEnv};

fn config_err(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn env_err(err: EnvError) -> PyErr {
    match err {
        EnvError::Config(err) => config_err(err),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Reads an `int` for discrete configs, or a sequence of two floats for
/// continuous ones.
fn extract_action(obj: &Bound<'_, PyAny>, kind: ActionSpaceKind) -> PyResult<Action> {
    Ok(match kind {
        ActionSpaceKind::Discrete4 => Action::Discrete(obj.extract::<i64>()?),
        ActionSpaceKind::Continuous2 => Action::Continuous(obj.extract::<[f32; 2]>()?),
    })
}

/// Pursuit environment exposed to Python training loops.
///
/// Discrete configs take an `int` action, continuous configs a list or
/// tuple of two floats.
#[pyclass(name = "PursuitEnv")]
pub struct PyPursuitEnv {
    inner: PursuitEnv<KinematicWorld>,
}

#[pymethods]
impl PyPursuitEnv {
    #[new]
    #[pyo3(signature = (config_json=None, seed=None))]
    fn new(config_json: Option<&str>, seed: Option<u64>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => Config::from_json_str(json).map_err(config_err)?,
            None => Config::default(),
        };
        let inner = match seed {
            Some(seed) => PursuitEnv::with_seed(config, KinematicWorld::new(), seed),
            None => PursuitEnv::kinematic(config),
        }
        .map_err(config_err)?;
        Ok(Self { inner })
    }

    #[pyo3(signature = (seed=None))]
    fn reset(&mut self, seed: Option<u64>) -> PyResult<Vec<f32>> {
        match seed {
            Some(seed) => self.inner.reset_with_seed(seed),
            None => self.inner.reset(),
        }
        .map_err(env_err)
    }

    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: &Bound<'py, PyAny>,
    ) -> PyResult<(Vec<f32>, f32, bool, Bound<'py, PyDict>)> {
        let kind = self.inner.config().action_space;
        let (obs, reward, done, info) = match extract_action(action, kind) {
            Ok(action) => self.inner.step(action),
            // Unparseable input is recovered as a no-op step, not raised.
            Err(err) => self.inner.step_malformed(err.to_string()),
        }
        .map_err(env_err)?;

        let dict = PyDict::new(py);
        dict.set_item("episode_id", info.episode_id.to_string())?;
        dict.set_item("step", info.step)?;
        dict.set_item("distance", info.distance)?;
        dict.set_item("time_penalty", info.reward.time_penalty)?;
        dict.set_item("shaped_reward", info.reward.shaped)?;
        dict.set_item("bonus", info.reward.bonus)?;
        dict.set_item("outcome", info.outcome.map(|o| o.label()))?;
        let recovered: Vec<String> = info.recovered.iter().map(ToString::to_string).collect();
        dict.set_item("recovered", recovered)?;

        Ok((obs, reward, done, dict))
    }

    fn close(&mut self) -> PyResult<()> {
        self.inner.close().map_err(env_err)
    }

    #[getter]
    fn observation_size(&self) -> usize {
        self.inner.observation_size()
    }

    #[getter]
    fn action_size(&self) -> usize {
        self.inner.action_size()
    }

    #[getter]
    fn config_json(&self) -> PyResult<String> {
        serde_json::to_string(self.inner.config())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}

/// A Python module implemented in Rust.
/// The name of this function must match the lib.name in Cargo.toml
#[pymodule]
fn pursuit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPursuitEnv>()?;
    Ok(())
}

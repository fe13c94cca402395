//! Python bindings for a presentation layer.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::LeagueConfig;
use crate::engine::SeasonEngine;
use crate::error::LeagueError;
use crate::fixtures::generate_schedule;
use crate::persistence::{JsonFileStore, MemoryStore, SeasonStore};
use crate::resolver::resolve_user_match;
use crate::season::SeasonStatus;

fn to_py_err(e: LeagueError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// A season session, backed by a JSON file when `save_path` is given.
#[pyclass(name = "Season")]
pub struct PySeason {
    engine: SeasonEngine<Box<dyn SeasonStore + Send>>,
}

#[pymethods]
impl PySeason {
    #[new]
    #[pyo3(signature = (save_path = None, config_path = None, seed = None))]
    fn new(
        save_path: Option<String>,
        config_path: Option<String>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => LeagueConfig::from_json_file(path).map_err(to_py_err)?,
            None => LeagueConfig::default(),
        };
        let store: Box<dyn SeasonStore + Send> = match save_path {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        let engine = match seed {
            Some(s) => SeasonEngine::with_seed(config, store, s),
            None => SeasonEngine::new(config, store),
        }
        .map_err(to_py_err)?;
        Ok(PySeason { engine })
    }

    /// Start a season; returns the number of matchdays.
    #[pyo3(signature = (goal = None))]
    fn start(&mut self, goal: Option<f64>) -> PyResult<usize> {
        let state = match goal {
            Some(g) => self.engine.start(g),
            None => self.engine.start_default(),
        }
        .map_err(to_py_err)?;
        Ok(state.total_rounds())
    }

    /// Play today's matchday; returns the summary and result lines.
    fn play_matchday(&mut self, calories: f64) -> PyResult<(String, Vec<String>)> {
        let report = self.engine.play_matchday(calories).map_err(to_py_err)?;
        Ok((report.to_string(), report.lines()))
    }

    fn reset(&mut self) -> PyResult<()> {
        self.engine.reset().map_err(to_py_err)
    }

    #[getter]
    fn status(&self) -> &'static str {
        match self.engine.status() {
            SeasonStatus::NotStarted => "not_started",
            SeasonStatus::InProgress { .. } => "in_progress",
            SeasonStatus::Finished => "finished",
        }
    }

    #[getter]
    fn matchday(&self) -> Option<usize> {
        self.engine.state().map(|s| s.matchday)
    }

    /// (position, name, played, points) in table order
    fn standings(&self) -> Vec<(usize, String, u32, u32)> {
        self.engine
            .standings()
            .into_iter()
            .map(|r| (r.position, r.row.name.clone(), r.row.played, r.row.points))
            .collect()
    }

    fn next_fixture(&self) -> Option<String> {
        self.engine.next_fixture().map(|f| f.to_string())
    }

    /// (name, expected points, expected position, title probability)
    #[pyo3(signature = (n_simulations, seed = None))]
    fn project(
        &self,
        n_simulations: usize,
        seed: Option<u64>,
    ) -> PyResult<Vec<(String, f64, f64, f64)>> {
        let projection = self.engine.project(n_simulations, seed).map_err(to_py_err)?;
        Ok(projection
            .rows
            .into_iter()
            .map(|r| (r.name, r.expected_points, r.expected_position, r.title_probability))
            .collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "Season({} participants, {:?})",
            self.engine.config().participants.len(),
            self.engine.status()
        )
    }
}

/// Double round-robin as a list of rounds of (home, away) pairs.
#[pyfunction]
#[pyo3(name = "generate_schedule")]
fn py_generate_schedule(participants: Vec<String>) -> Vec<Vec<(String, String)>> {
    generate_schedule(&participants)
        .rounds
        .into_iter()
        .map(|round| round.fixtures.into_iter().map(|f| (f.home, f.away)).collect())
        .collect()
}

/// (points, scoreline) for a day's calories against the goal.
#[pyfunction]
#[pyo3(name = "resolve_user_match")]
fn py_resolve_user_match(calories: f64, goal: f64) -> PyResult<(u32, String)> {
    let result = resolve_user_match(calories, goal).map_err(to_py_err)?;
    Ok((result.points, result.score().to_string()))
}

/// Python module definition
#[pymodule]
fn calorie_league(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySeason>()?;

    m.add_function(wrap_pyfunction!(py_generate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_resolve_user_match, m)?)?;

    m.add("DEFAULT_GOAL", crate::constants::DEFAULT_GOAL)?;
    m.add("DRAW_MARGIN", crate::constants::DRAW_MARGIN)?;

    Ok(())
}

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::driver::Driver;
use crate::error::{PlanningError, PlanningResult};
use crate::types::{Coordinate, Scenario};

/// Separator between state labels in a generated scenario name.
pub const DEFAULT_NAME_SEPARATOR: &str = " / ";

/// Largest matrix [`ScenarioMatrix::generate`] will build.
pub const MAX_SCENARIOS: usize = 1 << 20;

/// Build the scenario matrix for a set of drivers.
///
/// Shorthand for [`ScenarioMatrix::generate`].
pub fn generate_matrix(drivers: impl IntoIterator<Item = Driver>) -> PlanningResult<ScenarioMatrix> {
    ScenarioMatrix::generate(drivers)
}

/// Scenario matrix - the Cartesian product of the chosen drivers' states.
///
/// Scenarios are stored in row-major order: the last driver varies fastest.
/// The scenario set is fixed at generation; only names, assumptions,
/// narratives and probabilities change afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioMatrix {
    drivers: Vec<Driver>,
    scenarios: Vec<Scenario>,
}

impl ScenarioMatrix {
    /// Generate every combination of driver states with a uniform prior.
    ///
    /// Fails with a configuration error when no drivers are given or two
    /// drivers share a name. Empty or duplicate states are already ruled out
    /// by [`Driver::new`].
    pub fn generate(drivers: impl IntoIterator<Item = Driver>) -> PlanningResult<Self> {
        let drivers: Vec<Driver> = drivers.into_iter().collect();
        if drivers.is_empty() {
            return Err(PlanningError::NoDrivers);
        }

        let mut names = HashSet::with_capacity(drivers.len());
        for driver in &drivers {
            if !names.insert(driver.name()) {
                return Err(PlanningError::DuplicateDriver(driver.name().to_string()));
            }
        }

        let total = drivers
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.states().len()))
            .filter(|&total| total <= MAX_SCENARIOS)
            .ok_or(PlanningError::MatrixTooLarge {
                drivers: drivers.len(),
                limit: MAX_SCENARIOS,
            })?;
        let uniform = 1.0 / total as f64;

        let mut scenarios = Vec::with_capacity(total);
        let mut used_names: HashSet<String> = HashSet::with_capacity(total);
        // Odometer over state indices, last driver fastest
        let mut cursor = vec![0usize; drivers.len()];
        for ordinal in 0..total {
            let coordinates: Vec<Coordinate> = drivers
                .iter()
                .zip(&cursor)
                .map(|(d, &i)| Coordinate::new(d.name(), d.states()[i].as_str()))
                .collect();

            let mut name = default_name(&coordinates);
            if used_names.contains(&name) {
                // Labels containing the separator can collide
                name = format!("{} #{}", name, ordinal + 1);
            }
            used_names.insert(name.clone());

            scenarios.push(Scenario {
                name,
                coordinates,
                assumptions: Vec::new(),
                narrative: None,
                prior: uniform,
                probability: uniform,
            });

            for axis in (0..drivers.len()).rev() {
                cursor[axis] += 1;
                if cursor[axis] < drivers[axis].states().len() {
                    break;
                }
                cursor[axis] = 0;
            }
        }

        debug!(
            drivers = drivers.len(),
            scenarios = scenarios.len(),
            prior = uniform,
            "Scenario matrix generated"
        );

        Ok(Self { drivers, scenarios })
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Always false for a generated matrix; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn driver(&self, name: &str) -> PlanningResult<&Driver> {
        self.drivers
            .iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| PlanningError::DriverNotFound(name.to_string()))
    }

    /// Look up a scenario by its current name.
    pub fn scenario(&self, name: &str) -> PlanningResult<&Scenario> {
        self.index_of(name)
            .map(|i| &self.scenarios[i])
            .ok_or_else(|| PlanningError::ScenarioNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Look up a scenario by one state label per driver, in driver order.
    pub fn scenario_at<S: AsRef<str>>(&self, states: &[S]) -> PlanningResult<&Scenario> {
        let index = self.position_of(states)?;
        Ok(&self.scenarios[index])
    }

    /// Current probabilities, in matrix order.
    pub fn probabilities(&self) -> Vec<(&str, f64)> {
        self.scenarios
            .iter()
            .map(|s| (s.name.as_str(), s.probability))
            .collect()
    }

    pub fn probability_sum(&self) -> f64 {
        self.scenarios.iter().map(|s| s.probability).sum()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.name == name)
    }

    pub(crate) fn scenario_mut(&mut self, name: &str) -> PlanningResult<&mut Scenario> {
        let index = self
            .index_of(name)
            .ok_or_else(|| PlanningError::ScenarioNotFound(name.to_string()))?;
        Ok(&mut self.scenarios[index])
    }

    pub(crate) fn scenario_at_index_mut(&mut self, index: usize) -> &mut Scenario {
        &mut self.scenarios[index]
    }

    /// Validate `states` against each driver's declared state set and return
    /// the row-major position of the matching scenario.
    pub(crate) fn position_of<S: AsRef<str>>(&self, states: &[S]) -> PlanningResult<usize> {
        if states.len() != self.drivers.len() {
            return Err(PlanningError::StateCountMismatch {
                expected: self.drivers.len(),
                actual: states.len(),
            });
        }

        let mut position = 0usize;
        for (driver, state) in self.drivers.iter().zip(states) {
            let state = state.as_ref();
            let index = driver
                .state_index(state)
                .ok_or_else(|| PlanningError::StateNotFound {
                    driver: driver.name().to_string(),
                    state: state.to_string(),
                })?;
            position = position * driver.states().len() + index;
        }
        Ok(position)
    }

    /// Replace every probability. Caller guarantees one value per scenario.
    pub(crate) fn set_probabilities(&mut self, probabilities: &[f64]) {
        debug_assert_eq!(probabilities.len(), self.scenarios.len());
        for (scenario, p) in self.scenarios.iter_mut().zip(probabilities) {
            scenario.probability = *p;
        }
    }
}

fn default_name(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(|c| c.state.as_str())
        .collect::<Vec<_>>()
        .join(DEFAULT_NAME_SEPARATOR)
}

//! Scenario naming and enrichment.
//!
//! Names are display labels only. Coordinates never change, and signposts
//! refer to scenarios by name, so a rename re-targets every signpost that
//! uses the new name at its next resolution.

use tracing::debug;

use crate::error::{PlanningError, PlanningResult};
use crate::matrix::ScenarioMatrix;

impl ScenarioMatrix {
    /// Rebind the display name of the scenario at `states` (one label per
    /// driver, in driver order; `[x, y]` for a 2x2).
    ///
    /// Every label is checked against its driver's declared states, so a
    /// typo fails with `StateNotFound` instead of being silently accepted.
    pub fn name_scenario<S: AsRef<str>>(
        &mut self,
        states: &[S],
        label: impl Into<String>,
    ) -> PlanningResult<()> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(PlanningError::EmptyScenarioName);
        }

        let index = self.position_of(states)?;
        if let Some(existing) = self.index_of(&label) {
            if existing == index {
                return Ok(());
            }
            return Err(PlanningError::DuplicateScenarioName(label));
        }

        let scenario = self.scenario_at_index_mut(index);
        debug!(from = %scenario.name, to = %label, "Scenario renamed");
        scenario.name = label;
        Ok(())
    }

    /// Append a free-text assumption to a scenario.
    pub fn add_assumption(&mut self, scenario: &str, assumption: impl Into<String>) -> PlanningResult<()> {
        self.scenario_mut(scenario)?.assumptions.push(assumption.into());
        Ok(())
    }

    /// Set (or replace) a scenario's narrative.
    pub fn set_narrative(&mut self, scenario: &str, narrative: impl Into<String>) -> PlanningResult<()> {
        self.scenario_mut(scenario)?.narrative = Some(narrative.into());
        Ok(())
    }
}

/// Fluent enrichment of a generated matrix.
///
/// ```
/// use foresight_core::{generate_matrix, Driver, ScenarioBuilder};
///
/// let mut matrix = generate_matrix(vec![
///     Driver::with_states("AI Progress", ["Breakthrough", "Incremental"]).unwrap(),
///     Driver::with_states("Regulation", ["Heavy", "Light"]).unwrap(),
/// ])
/// .unwrap();
///
/// ScenarioBuilder::new(&mut matrix)
///     .name(&["Breakthrough", "Light"], "Tech Utopia")
///     .unwrap()
///     .assume("Tech Utopia", "Compute keeps getting cheaper")
///     .unwrap();
///
/// assert_eq!(matrix.scenario("Tech Utopia").unwrap().assumptions.len(), 1);
/// ```
pub struct ScenarioBuilder<'m> {
    matrix: &'m mut ScenarioMatrix,
}

impl<'m> ScenarioBuilder<'m> {
    pub fn new(matrix: &'m mut ScenarioMatrix) -> Self {
        Self { matrix }
    }

    pub fn name<S: AsRef<str>>(self, states: &[S], label: impl Into<String>) -> PlanningResult<Self> {
        self.matrix.name_scenario(states, label)?;
        Ok(self)
    }

    pub fn assume(self, scenario: &str, assumption: impl Into<String>) -> PlanningResult<Self> {
        self.matrix.add_assumption(scenario, assumption)?;
        Ok(self)
    }

    pub fn narrate(self, scenario: &str, narrative: impl Into<String>) -> PlanningResult<Self> {
        self.matrix.set_narrative(scenario, narrative)?;
        Ok(self)
    }

    /// Hand the borrowed matrix back for inspection.
    pub fn matrix(&self) -> &ScenarioMatrix {
        &*self.matrix
    }
}

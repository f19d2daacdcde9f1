use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{PlanningError, PlanningResult};
use crate::types::Rating;

/// A named axis of strategic uncertainty with discrete possible states.
///
/// Only constructed through [`Driver::new`], so the state invariants always hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Driver {
    name: String,
    states: Vec<String>,
    uncertainty: Rating,
    impact: Rating,
}

impl Driver {
    /// Create a driver, checking that it has at least one state and that
    /// every state label is non-empty and unique.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
        uncertainty: Rating,
        impact: Rating,
    ) -> PlanningResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanningError::EmptyDriverName);
        }

        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        if states.is_empty() {
            return Err(PlanningError::NoStates { driver: name });
        }

        let mut seen = HashSet::with_capacity(states.len());
        for state in &states {
            if state.trim().is_empty() {
                return Err(PlanningError::EmptyStateLabel { driver: name });
            }
            if !seen.insert(state.as_str()) {
                return Err(PlanningError::DuplicateState {
                    driver: name,
                    state: state.clone(),
                });
            }
        }

        Ok(Self {
            name,
            states,
            uncertainty,
            impact,
        })
    }

    /// Shorthand for a driver rated medium on both scales.
    pub fn with_states<S: Into<String>>(
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> PlanningResult<Self> {
        Self::new(name, states, Rating::Medium, Rating::Medium)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn uncertainty(&self) -> Rating {
        self.uncertainty
    }

    pub fn impact(&self) -> Rating {
        self.impact
    }

    pub fn has_state(&self, label: &str) -> bool {
        self.states.iter().any(|s| s == label)
    }

    pub fn state_index(&self, label: &str) -> Option<usize> {
        self.states.iter().position(|s| s == label)
    }

    /// Ranking score: uncertainty weight times impact weight (1..=9).
    pub fn criticality(&self) -> u32 {
        self.uncertainty.weight() * self.impact.weight()
    }
}

/// Driver analysis - collects candidate drivers and decides which ones
/// become scenario axes.
///
/// High-impact drivers split into two groups:
/// - **critical uncertainties**: uncertainty at least medium, good axes
/// - **predetermined elements**: low uncertainty, hold in every scenario
#[derive(Clone, Debug, Default)]
pub struct DriverAnalysis {
    drivers: Vec<Driver>,
}

impl DriverAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate driver. Driver names must be unique.
    pub fn add_driver(&mut self, driver: Driver) -> PlanningResult<()> {
        if self.drivers.iter().any(|d| d.name == driver.name) {
            return Err(PlanningError::DuplicateDriver(driver.name));
        }
        debug!(
            driver = %driver.name,
            uncertainty = %driver.uncertainty,
            impact = %driver.impact,
            "Driver registered for analysis"
        );
        self.drivers.push(driver);
        Ok(())
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn driver(&self, name: &str) -> PlanningResult<&Driver> {
        self.drivers
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| PlanningError::DriverNotFound(name.to_string()))
    }

    /// Drivers ordered by criticality, highest first. Ties go to the
    /// higher impact, then to registration order.
    pub fn ranked(&self) -> Vec<&Driver> {
        let mut ranked: Vec<&Driver> = self.drivers.iter().collect();
        // sort_by is stable, so registration order survives full ties
        ranked.sort_by(|a, b| {
            b.criticality()
                .cmp(&a.criticality())
                .then_with(|| b.impact.cmp(&a.impact))
        });
        ranked
    }

    pub fn critical_uncertainties(&self) -> Vec<&Driver> {
        self.ranked()
            .into_iter()
            .filter(|d| d.impact == Rating::High && d.uncertainty >= Rating::Medium)
            .collect()
    }

    pub fn predetermined_elements(&self) -> Vec<&Driver> {
        self.drivers
            .iter()
            .filter(|d| d.impact == Rating::High && d.uncertainty == Rating::Low)
            .collect()
    }

    /// Pick the `n` top-ranked drivers as matrix axes, skipping
    /// predetermined elements. Two axes give the classic 2x2.
    pub fn select_axes(&self, n: usize) -> PlanningResult<Vec<Driver>> {
        let candidates: Vec<&Driver> = self
            .ranked()
            .into_iter()
            .filter(|d| !(d.impact == Rating::High && d.uncertainty == Rating::Low))
            .collect();

        if n == 0 || candidates.len() < n {
            return Err(PlanningError::AxisSelection {
                requested: n,
                available: candidates.len(),
            });
        }

        let axes: Vec<Driver> = candidates.into_iter().take(n).cloned().collect();
        debug!(
            axes = ?axes.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "Matrix axes selected"
        );
        Ok(axes)
    }
}

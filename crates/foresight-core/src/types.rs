use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordinal rating used for a driver's uncertainty and impact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    #[default]
    Medium,
    High,
}

impl Rating {
    /// Numeric weight used when ranking drivers (1, 2, 3).
    pub fn weight(&self) -> u32 {
        match self {
            Rating::Low => 1,
            Rating::Medium => 2,
            Rating::High => 3,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Low => write!(f, "low"),
            Rating::Medium => write!(f, "medium"),
            Rating::High => write!(f, "high"),
        }
    }
}

/// One axis position of a scenario: the state a driver takes in it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub driver: String,
    pub state: String,
}

impl Coordinate {
    pub fn new(driver: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            state: state.into(),
        }
    }
}

/// A scenario - one coherent combination of driver states.
///
/// Coordinates are kept in driver order, one entry per driver of the
/// matrix that produced the scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, unique within its matrix
    pub name: String,
    /// Selected state per driver, in driver order
    pub coordinates: Vec<Coordinate>,
    /// Free-text assumptions attached during the workshop
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Optional story describing how this future unfolds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Baseline probability assigned at generation
    pub prior: f64,
    /// Current probability estimate in [0, 1]
    pub probability: f64,
}

impl Scenario {
    /// State selected for the named driver, if the driver is an axis.
    pub fn state_for(&self, driver: &str) -> Option<&str> {
        self.coordinates
            .iter()
            .find(|c| c.driver == driver)
            .map(|c| c.state.as_str())
    }

    /// State labels in driver order.
    pub fn states(&self) -> Vec<&str> {
        self.coordinates.iter().map(|c| c.state.as_str()).collect()
    }
}

/// Signpost lifecycle. `Untriggered -> Triggered` is one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignpostStatus {
    #[default]
    Untriggered,
    Triggered,
}

/// An observable indicator that a particular scenario is unfolding.
///
/// The target is held by scenario *name* and resolved against a matrix at
/// the point of use, so renames and rebuilds never leave a dangling pointer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signpost {
    pub description: String,
    pub target_scenario: String,
    /// Additive weight in (0, 1]
    pub weight: f64,
    #[serde(default)]
    pub status: SignpostStatus,
    /// When the signpost was first observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Signpost {
    pub fn is_triggered(&self) -> bool {
        self.status == SignpostStatus::Triggered
    }

    /// Mark as observed. Returns `false` if it was already triggered.
    pub(crate) fn mark_triggered(&mut self) -> bool {
        if self.is_triggered() {
            return false;
        }
        self.status = SignpostStatus::Triggered;
        self.triggered_at = Some(Utc::now());
        true
    }
}

/// A strategy in the portfolio under test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    /// Share of the portfolio in [0, 1]
    pub portfolio_weight: f64,
}

/// How the stress tester interprets portfolio weights.
///
/// Always chosen explicitly; never inferred from the weights themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightingMode {
    /// Weights are shares of one portfolio and must sum to 1
    #[default]
    Normalized,
    /// Each weight stands alone; no sum constraint
    Independent,
}

impl std::fmt::Display for WeightingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightingMode::Normalized => write!(f, "normalized"),
            WeightingMode::Independent => write!(f, "independent"),
        }
    }
}

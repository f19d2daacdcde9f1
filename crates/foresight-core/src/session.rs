//! Planning session - the explicit owner of one workshop's state.
//!
//! A session owns the driver analysis, the scenario matrix, the signpost
//! tracker and the strategy tester. Nothing is process-wide: callers create
//! a session, pass it around, and drop it when the workshop ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::driver::{Driver, DriverAnalysis};
use crate::error::PlanningResult;
use crate::matrix::ScenarioMatrix;
use crate::naming::ScenarioBuilder;
use crate::signpost::SignpostTracker;
use crate::stress::{LinearScoring, OutcomeTableScoring, RobustnessReport, ScoringPolicy, StrategyTester};
use crate::types::{Rating, Scenario, Signpost, Strategy, WeightingMode};

/// Declarative description of a whole session, as read from a session file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mode: WeightingMode,
    pub drivers: Vec<DriverSpec>,
    /// Use only the top-ranked `axes` drivers as matrix axes
    #[serde(default)]
    pub axes: Option<usize>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioSpec>,
    #[serde(default)]
    pub signposts: Vec<SignpostSpec>,
    /// Descriptions of signposts already observed
    #[serde(default)]
    pub triggered: Vec<String>,
    #[serde(default)]
    pub strategies: Vec<StrategySpec>,
    /// Workshop payoff table; linear scoring when absent
    #[serde(default)]
    pub outcomes: Option<OutcomeTableScoring>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverSpec {
    pub name: String,
    pub states: Vec<String>,
    #[serde(default)]
    pub uncertainty: Rating,
    #[serde(default)]
    pub impact: Rating,
}

/// Names and enriches the scenario at `states`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub states: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub narrative: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignpostSpec {
    pub description: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    pub weight: f64,
}

/// Serializable snapshot of a session.
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub drivers: Vec<Driver>,
    pub predetermined_elements: Vec<String>,
    pub scenarios: Vec<Scenario>,
    pub signposts: Vec<Signpost>,
    pub strategies: Vec<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robustness: Option<RobustnessReport>,
}

pub struct PlanningSession {
    id: Uuid,
    title: Option<String>,
    analysis: DriverAnalysis,
    matrix: ScenarioMatrix,
    tracker: SignpostTracker,
    tester: StrategyTester,
    outcomes: Option<OutcomeTableScoring>,
}

impl PlanningSession {
    /// Start a session whose matrix spans every given driver.
    pub fn new(drivers: Vec<Driver>, mode: WeightingMode) -> PlanningResult<Self> {
        let mut analysis = DriverAnalysis::new();
        for driver in &drivers {
            analysis.add_driver(driver.clone())?;
        }
        let matrix = ScenarioMatrix::generate(drivers)?;
        Ok(Self::assemble(analysis, matrix, mode))
    }

    /// Start a session whose matrix spans the `n` top-ranked drivers of
    /// `analysis`.
    pub fn with_axes(analysis: DriverAnalysis, n: usize, mode: WeightingMode) -> PlanningResult<Self> {
        let axes = analysis.select_axes(n)?;
        let matrix = ScenarioMatrix::generate(axes)?;
        Ok(Self::assemble(analysis, matrix, mode))
    }

    /// Replay a session description: drivers, matrix, naming and
    /// enrichment, signposts, triggers, probability update, strategies.
    pub fn from_spec(spec: SessionSpec) -> PlanningResult<Self> {
        let mut analysis = DriverAnalysis::new();
        for d in spec.drivers {
            analysis.add_driver(Driver::new(d.name, d.states, d.uncertainty, d.impact)?)?;
        }

        let mut session = match spec.axes {
            Some(n) => Self::with_axes(analysis, n, spec.mode)?,
            None => {
                let drivers = analysis.drivers().to_vec();
                let matrix = ScenarioMatrix::generate(drivers)?;
                Self::assemble(analysis, matrix, spec.mode)
            }
        };
        session.title = spec.title;

        for scenario in spec.scenarios {
            if let Some(name) = scenario.name {
                session.matrix.name_scenario(&scenario.states, name)?;
            }
            let name = session.matrix.scenario_at(&scenario.states)?.name.clone();
            for assumption in scenario.assumptions {
                session.matrix.add_assumption(&name, assumption)?;
            }
            if let Some(narrative) = scenario.narrative {
                session.matrix.set_narrative(&name, narrative)?;
            }
        }

        for signpost in spec.signposts {
            session
                .tracker
                .add_signpost(signpost.description, signpost.target, signpost.weight)?;
        }
        for description in &spec.triggered {
            session.tracker.trigger(description)?;
        }
        session.update_probabilities()?;

        for strategy in spec.strategies {
            session.tester.add_strategy(strategy.name, strategy.weight)?;
        }
        session.outcomes = spec.outcomes;

        info!(
            session = %session.id,
            scenarios = session.matrix.len(),
            signposts = session.tracker.signposts().len(),
            strategies = session.tester.strategies().len(),
            "Planning session loaded"
        );
        Ok(session)
    }

    fn assemble(analysis: DriverAnalysis, matrix: ScenarioMatrix, mode: WeightingMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: None,
            analysis,
            matrix,
            tracker: SignpostTracker::new(),
            tester: StrategyTester::new(mode),
            outcomes: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn analysis(&self) -> &DriverAnalysis {
        &self.analysis
    }

    pub fn matrix(&self) -> &ScenarioMatrix {
        &self.matrix
    }

    /// Name and enrich scenarios of this session's matrix.
    pub fn builder(&mut self) -> ScenarioBuilder<'_> {
        ScenarioBuilder::new(&mut self.matrix)
    }

    pub fn tracker(&self) -> &SignpostTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SignpostTracker {
        &mut self.tracker
    }

    pub fn tester(&self) -> &StrategyTester {
        &self.tester
    }

    pub fn tester_mut(&mut self) -> &mut StrategyTester {
        &mut self.tester
    }

    pub fn outcomes(&self) -> Option<&OutcomeTableScoring> {
        self.outcomes.as_ref()
    }

    pub fn set_outcomes(&mut self, outcomes: OutcomeTableScoring) {
        self.outcomes = Some(outcomes);
    }

    /// Trigger a signpost and re-weight the matrix in one step.
    pub fn observe(&mut self, description: &str) -> PlanningResult<()> {
        self.tracker.trigger(description)?;
        self.update_probabilities()
    }

    pub fn update_probabilities(&mut self) -> PlanningResult<()> {
        self.tracker.probability_update(&mut self.matrix)
    }

    pub fn stress_test(&self, policy: &dyn ScoringPolicy) -> PlanningResult<RobustnessReport> {
        self.tester.stress_test(&self.matrix, policy)
    }

    /// Stress test with the session's payoff table, or linear scoring when
    /// none was entered.
    pub fn stress_test_default(&self) -> PlanningResult<RobustnessReport> {
        match &self.outcomes {
            Some(table) => self.stress_test(table),
            None => self.stress_test(&LinearScoring),
        }
    }

    /// Snapshot the session. The robustness section is omitted when no
    /// strategies are registered.
    pub fn report(&self) -> PlanningResult<SessionReport> {
        let robustness = if self.tester.strategies().is_empty() {
            None
        } else {
            Some(self.stress_test_default()?)
        };

        Ok(SessionReport {
            session_id: self.id,
            title: self.title.clone(),
            generated_at: Utc::now(),
            drivers: self.matrix.drivers().to_vec(),
            predetermined_elements: self
                .analysis
                .predetermined_elements()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
            scenarios: self.matrix.scenarios().to_vec(),
            signposts: self.tracker.signposts().to_vec(),
            strategies: self.tester.strategies().to_vec(),
            robustness,
        })
    }
}

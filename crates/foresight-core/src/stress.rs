use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlanningError, PlanningResult};
use crate::matrix::ScenarioMatrix;
use crate::types::{Scenario, Strategy, WeightingMode};

/// Tolerance when checking that normalized portfolio weights sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Outcome scoring for a (strategy, scenario) pair.
///
/// The stress tester never assumes a formula; callers pick a policy.
pub trait ScoringPolicy {
    /// Short identifier recorded in the report.
    fn name(&self) -> &str;

    /// Outcome of running `strategy` in `scenario`. Higher is better.
    fn score(&self, strategy: &Strategy, scenario: &Scenario) -> f64;
}

/// Default policy: portfolio weight times scenario probability.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearScoring;

impl ScoringPolicy for LinearScoring {
    fn name(&self) -> &str {
        "linear"
    }

    fn score(&self, strategy: &Strategy, scenario: &Scenario) -> f64 {
        strategy.portfolio_weight * scenario.probability
    }
}

/// Payoffs entered per (strategy, scenario) during a workshop, scaled by
/// portfolio weight. Cells not filled in score `default_payoff`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutcomeTableScoring {
    /// strategy name -> scenario name -> payoff
    #[serde(default)]
    pub payoffs: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    pub default_payoff: f64,
}

impl OutcomeTableScoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default_payoff: f64) -> Self {
        self.default_payoff = default_payoff;
        self
    }

    pub fn set(&mut self, strategy: impl Into<String>, scenario: impl Into<String>, payoff: f64) {
        self.payoffs
            .entry(strategy.into())
            .or_default()
            .insert(scenario.into(), payoff);
    }

    pub fn payoff(&self, strategy: &str, scenario: &str) -> f64 {
        self.payoffs
            .get(strategy)
            .and_then(|row| row.get(scenario))
            .copied()
            .unwrap_or(self.default_payoff)
    }
}

impl ScoringPolicy for OutcomeTableScoring {
    fn name(&self) -> &str {
        "outcome-table"
    }

    fn score(&self, strategy: &Strategy, scenario: &Scenario) -> f64 {
        strategy.portfolio_weight * self.payoff(&strategy.name, &scenario.name)
    }
}

/// One scenario's outcome for a strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub probability: f64,
    pub score: f64,
}

/// Stress result for a single strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyRobustness {
    pub strategy: String,
    pub portfolio_weight: f64,
    /// Probability-weighted outcome across all scenarios
    pub expected: f64,
    pub best_case: ScenarioOutcome,
    pub worst_case: ScenarioOutcome,
    /// `best_case.score - worst_case.score`
    pub spread: f64,
    /// Every scenario's outcome, in matrix order
    pub outcomes: Vec<ScenarioOutcome>,
}

/// Per-strategy summary of expected, best and worst outcomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobustnessReport {
    pub policy: String,
    pub mode: WeightingMode,
    pub strategies: Vec<StrategyRobustness>,
}

impl RobustnessReport {
    pub fn strategy(&self, name: &str) -> Option<&StrategyRobustness> {
        self.strategies.iter().find(|s| s.strategy == name)
    }

    /// Strategy with the highest worst case (maximin). First wins on ties.
    pub fn most_robust(&self) -> Option<&StrategyRobustness> {
        self.strategies.iter().fold(None, |best, s| match best {
            Some(b) if b.worst_case.score >= s.worst_case.score => Some(b),
            _ => Some(s),
        })
    }

    /// Strategy with the highest expected outcome. First wins on ties.
    pub fn best_expected(&self) -> Option<&StrategyRobustness> {
        self.strategies.iter().fold(None, |best, s| match best {
            Some(b) if b.expected >= s.expected => Some(b),
            _ => Some(s),
        })
    }

    /// Expected outcomes by strategy name.
    pub fn expected_by_strategy(&self) -> HashMap<&str, f64> {
        self.strategies
            .iter()
            .map(|s| (s.strategy.as_str(), s.expected))
            .collect()
    }
}

/// Strategy stress tester - evaluates a strategy portfolio against every
/// scenario of a matrix.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StrategyTester {
    mode: WeightingMode,
    strategies: Vec<Strategy>,
}

impl StrategyTester {
    pub fn new(mode: WeightingMode) -> Self {
        Self {
            mode,
            strategies: Vec::new(),
        }
    }

    pub fn mode(&self) -> WeightingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WeightingMode) {
        self.mode = mode;
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Register a strategy with a portfolio weight in [0, 1].
    pub fn add_strategy(&mut self, name: impl Into<String>, portfolio_weight: f64) -> PlanningResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanningError::EmptyStrategyName);
        }
        if !portfolio_weight.is_finite() || !(0.0..=1.0).contains(&portfolio_weight) {
            return Err(PlanningError::InvalidPortfolioWeight {
                strategy: name,
                weight: portfolio_weight,
            });
        }
        if self.strategies.iter().any(|s| s.name == name) {
            return Err(PlanningError::DuplicateStrategy(name));
        }

        debug!(strategy = %name, portfolio_weight, "Strategy registered");
        self.strategies.push(Strategy {
            name,
            portfolio_weight,
        });
        Ok(())
    }

    pub fn weight_sum(&self) -> f64 {
        self.strategies.iter().map(|s| s.portfolio_weight).sum()
    }

    /// Check the portfolio against the weighting mode.
    pub fn validate(&self) -> PlanningResult<()> {
        if self.mode == WeightingMode::Normalized {
            let sum = self.weight_sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                warn!(sum, "Portfolio weights are not normalized");
                return Err(PlanningError::PortfolioNotNormalized { sum });
            }
        }
        Ok(())
    }

    /// Score every (strategy, scenario) pair and summarize per strategy.
    pub fn stress_test(
        &self,
        matrix: &ScenarioMatrix,
        policy: &dyn ScoringPolicy,
    ) -> PlanningResult<RobustnessReport> {
        self.validate()?;

        let strategies: Vec<StrategyRobustness> = self
            .strategies
            .iter()
            .map(|strategy| evaluate(strategy, matrix, policy))
            .collect();

        debug!(
            policy = policy.name(),
            mode = %self.mode,
            strategies = strategies.len(),
            scenarios = matrix.len(),
            "Stress test complete"
        );

        Ok(RobustnessReport {
            policy: policy.name().to_string(),
            mode: self.mode,
            strategies,
        })
    }
}

fn evaluate(strategy: &Strategy, matrix: &ScenarioMatrix, policy: &dyn ScoringPolicy) -> StrategyRobustness {
    let outcomes: Vec<ScenarioOutcome> = matrix
        .scenarios()
        .iter()
        .map(|scenario| ScenarioOutcome {
            scenario: scenario.name.clone(),
            probability: scenario.probability,
            score: policy.score(strategy, scenario),
        })
        .collect();

    let expected = outcomes.iter().map(|o| o.probability * o.score).sum();

    // A matrix always has at least one scenario
    let mut best = &outcomes[0];
    let mut worst = &outcomes[0];
    for outcome in &outcomes[1..] {
        if outcome.score > best.score {
            best = outcome;
        }
        if outcome.score < worst.score {
            worst = outcome;
        }
    }

    StrategyRobustness {
        strategy: strategy.name.clone(),
        portfolio_weight: strategy.portfolio_weight,
        expected,
        best_case: best.clone(),
        worst_case: worst.clone(),
        spread: best.score - worst.score,
        outcomes,
    }
}

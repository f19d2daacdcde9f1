//! # foresight-core
//!
//! Scenario planning kernel:
//!
//! - **Drivers** - named axes of uncertainty with discrete states, ranked by
//!   [`DriverAnalysis`] into critical uncertainties and predetermined elements
//! - **Scenario Matrix** - the Cartesian product of the chosen drivers'
//!   states, with a uniform prior and deterministic default names
//! - **Signpost Tracker** - observable indicators that re-weight scenario
//!   probabilities when triggered
//! - **Strategy Stress Tester** - probability-weighted, best-case and
//!   worst-case outcomes per strategy under a pluggable [`ScoringPolicy`]
//!
//! ## Invariants
//!
//! - A matrix holds exactly `∏ |states(Di)|` scenarios with unique
//!   coordinates, and its probabilities sum to 1.
//! - Signposts reference scenarios by name; the name is resolved when the
//!   signpost is used, never stored as a pointer.
//! - Triggering is one-way and idempotent; the probability update is a fixed
//!   point when no new signposts are triggered.
//! - Portfolio weights are read under an explicit [`WeightingMode`].
//!
//! All state lives in explicitly constructed values (usually one
//! [`PlanningSession`] per workshop). There are no global registries.

pub mod driver;
pub mod error;
pub mod matrix;
pub mod naming;
pub mod session;
pub mod signpost;
pub mod stress;
pub mod types;

pub use driver::{Driver, DriverAnalysis};
pub use error::{ErrorKind, PlanningError, PlanningResult};
pub use matrix::{generate_matrix, ScenarioMatrix, DEFAULT_NAME_SEPARATOR, MAX_SCENARIOS};
pub use naming::ScenarioBuilder;
pub use session::{
    DriverSpec, PlanningSession, ScenarioSpec, SessionReport, SessionSpec, SignpostSpec,
    StrategySpec,
};
pub use signpost::{Resolution, SignpostTracker};
pub use stress::{
    LinearScoring, OutcomeTableScoring, RobustnessReport, ScenarioOutcome, ScoringPolicy,
    StrategyRobustness, StrategyTester, WEIGHT_SUM_TOLERANCE,
};
pub use types::{Coordinate, Rating, Scenario, Signpost, SignpostStatus, Strategy, WeightingMode};

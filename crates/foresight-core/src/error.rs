use thiserror::Error;

/// The two error categories a planning session can raise.
///
/// Every [`PlanningError`] belongs to exactly one kind. Callers that only
/// want to distinguish "bad setup" from "unknown reference" match on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing setup input (zero drivers, malformed weights, ...)
    Configuration,
    /// Reference to an undeclared scenario, driver state, driver or signpost
    NotFound,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration error"),
            ErrorKind::NotFound => write!(f, "not found"),
        }
    }
}

/// Errors from driver analysis, matrix construction, signpost tracking and
/// stress testing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    // --- Driver / matrix configuration ---
    #[error("at least one driver is required to build a scenario matrix")]
    NoDrivers,

    #[error("driver name must not be empty")]
    EmptyDriverName,

    #[error("driver {driver} declares no states")]
    NoStates { driver: String },

    #[error("driver {driver} has an empty state label")]
    EmptyStateLabel { driver: String },

    #[error("driver {driver} declares state {state} more than once")]
    DuplicateState { driver: String, state: String },

    #[error("driver {0} is declared more than once")]
    DuplicateDriver(String),

    #[error("{drivers} drivers span more than {limit} scenarios")]
    MatrixTooLarge { drivers: usize, limit: usize },

    #[error("cannot select {requested} axes from {available} drivers")]
    AxisSelection { requested: usize, available: usize },

    // --- Scenario naming ---
    #[error("expected one state per driver ({expected}), got {actual}")]
    StateCountMismatch { expected: usize, actual: usize },

    #[error("scenario name must not be empty")]
    EmptyScenarioName,

    #[error("scenario name {0} is already used by another scenario")]
    DuplicateScenarioName(String),

    // --- Signposts ---
    #[error("signpost description must not be empty")]
    EmptySignpostDescription,

    #[error("signpost {description} weight {weight} is outside (0, 1]")]
    InvalidSignpostWeight { description: String, weight: f64 },

    #[error("signpost {0} is already registered")]
    DuplicateSignpost(String),

    // --- Strategies ---
    #[error("strategy name must not be empty")]
    EmptyStrategyName,

    #[error("strategy {strategy} portfolio weight {weight} is outside [0, 1]")]
    InvalidPortfolioWeight { strategy: String, weight: f64 },

    #[error("strategy {0} is already registered")]
    DuplicateStrategy(String),

    #[error(
        "portfolio weights sum to {sum:.6}, not 1; use independent weighting for unnormalized weights"
    )]
    PortfolioNotNormalized { sum: f64 },

    // --- Lookups ---
    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("driver {driver} has no state {state}")]
    StateNotFound { driver: String, state: String },

    #[error("driver not found: {0}")]
    DriverNotFound(String),

    #[error("signpost not found: {0}")]
    SignpostNotFound(String),
}

impl PlanningError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanningError::ScenarioNotFound(_)
            | PlanningError::StateNotFound { .. }
            | PlanningError::DriverNotFound(_)
            | PlanningError::SignpostNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Configuration,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result alias used throughout the planning kernel.
pub type PlanningResult<T> = Result<T, PlanningError>;

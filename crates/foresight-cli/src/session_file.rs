//! Session files: a whole planning session described in YAML, JSON or TOML.

use std::path::Path;

use foresight_core::{PlanningSession, SessionSpec, WeightingMode};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Parse a session description, choosing the format from the extension.
pub fn load_spec(path: &Path) -> CliResult<SessionSpec> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let spec = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)?,
        "json" => serde_json::from_str(&contents)?,
        "toml" => toml::from_str(&contents)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "unsupported session file extension '{}' (expected yaml, yml, json or toml)",
                other
            )))
        }
    };
    debug!(path = %path.display(), "Session file parsed");
    Ok(spec)
}

/// Load a session and apply extra triggers given on the command line.
pub fn open_session(path: &Path, triggers: &[String]) -> CliResult<PlanningSession> {
    let mut session = PlanningSession::from_spec(load_spec(path)?)?;
    for description in triggers {
        session.observe(description)?;
    }
    Ok(session)
}

/// Override the session's weighting mode: the flag first, then the config.
pub fn apply_mode(session: &mut PlanningSession, flag: Option<WeightingMode>, config: &CliConfig) {
    if let Some(mode) = flag.or(config.mode) {
        debug!(%mode, "Weighting mode overridden");
        session.tester_mut().set_mode(mode);
    }
}

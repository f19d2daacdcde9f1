//! Signpost tracking

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use foresight_core::{Signpost, SignpostStatus};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::session_file;

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Session file (yaml, json or toml)
    pub session: PathBuf,

    /// Mark a signpost as observed (repeatable)
    #[arg(short, long = "trigger", value_name = "DESCRIPTION")]
    pub triggers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TrackOutput<'a> {
    signposts: &'a [Signpost],
    probabilities: Vec<ScenarioProbability>,
}

#[derive(Debug, Serialize)]
struct ScenarioProbability {
    scenario: String,
    probability: f64,
}

#[derive(Tabled)]
struct SignpostRow {
    signpost: String,
    target: String,
    weight: f64,
    status: String,
}

#[derive(Tabled)]
struct ProbabilityRow {
    scenario: String,
    prior: String,
    probability: String,
}

pub fn execute(args: TrackArgs, format: OutputFormat) -> CliResult<()> {
    let session = session_file::open_session(&args.session, &args.triggers)?;
    let tracker = session.tracker();
    let matrix = session.matrix();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = TrackOutput {
                signposts: tracker.signposts(),
                probabilities: matrix
                    .probabilities()
                    .into_iter()
                    .map(|(scenario, probability)| ScenarioProbability {
                        scenario: scenario.to_string(),
                        probability,
                    })
                    .collect(),
            };
            output::print_structured(&out, format)?;
        }
        OutputFormat::Table => {
            output::print_heading("Signposts");
            let rows: Vec<SignpostRow> = tracker
                .signposts()
                .iter()
                .map(|s| SignpostRow {
                    signpost: s.description.clone(),
                    target: s.target_scenario.clone(),
                    weight: s.weight,
                    status: match s.status {
                        SignpostStatus::Triggered => "triggered".green().to_string(),
                        SignpostStatus::Untriggered => "watching".dimmed().to_string(),
                    },
                })
                .collect();
            output::print_table(rows);
            println!();

            output::print_heading("Scenario Probabilities");
            let rows: Vec<ProbabilityRow> = matrix
                .scenarios()
                .iter()
                .map(|s| ProbabilityRow {
                    scenario: s.name.clone(),
                    prior: output::percent(s.prior),
                    probability: output::percent(s.probability),
                })
                .collect();
            output::print_table(rows);
            println!();
            println!(
                "{} of {} signpost(s) triggered",
                tracker.triggered().len().to_string().bold(),
                tracker.signposts().len()
            );
        }
    }
    Ok(())
}

//! Scenario matrix display

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::session_file;

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Session file (yaml, json or toml)
    pub session: PathBuf,

    /// Also print assumptions and narratives
    #[arg(long)]
    pub narratives: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ScenarioRow {
    scenario: String,
    states: String,
    prior: String,
    probability: String,
    assumptions: usize,
}

pub fn execute(args: MatrixArgs, format: OutputFormat) -> CliResult<()> {
    let session = session_file::open_session(&args.session, &[])?;
    let matrix = session.matrix();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(matrix.scenarios(), format)?,
        OutputFormat::Table => {
            let axes: Vec<&str> = matrix.drivers().iter().map(|d| d.name()).collect();
            output::print_heading(&format!("Scenario Matrix ({})", axes.join(" x ")));

            let rows: Vec<ScenarioRow> = matrix
                .scenarios()
                .iter()
                .map(|s| ScenarioRow {
                    scenario: s.name.clone(),
                    states: s.states().join(", "),
                    prior: output::percent(s.prior),
                    probability: output::percent(s.probability),
                    assumptions: s.assumptions.len(),
                })
                .collect();
            output::print_table(rows);

            if args.narratives {
                for scenario in matrix.scenarios() {
                    if scenario.assumptions.is_empty() && scenario.narrative.is_none() {
                        continue;
                    }
                    println!();
                    println!("{}", scenario.name.bold());
                    for assumption in &scenario.assumptions {
                        println!("  - {}", assumption);
                    }
                    if let Some(narrative) = &scenario.narrative {
                        println!("  {}", narrative.italic());
                    }
                }
            }
            println!();
            println!("Total: {} scenario(s)", matrix.len());
        }
    }
    Ok(())
}

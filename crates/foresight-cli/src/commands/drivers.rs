//! Driver ranking

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use foresight_core::{Driver, PlanningSession};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::session_file;

#[derive(Args, Debug)]
pub struct DriversArgs {
    /// Session file (yaml, json or toml)
    pub session: PathBuf,
}

/// Driver info for display
#[derive(Debug, Serialize, Tabled)]
struct DriverRow {
    rank: usize,
    driver: String,
    states: String,
    uncertainty: String,
    impact: String,
    criticality: u32,
    role: String,
}

fn role(driver: &Driver, session: &PlanningSession) -> &'static str {
    if session.matrix().driver(driver.name()).is_ok() {
        "axis"
    } else if session
        .analysis()
        .predetermined_elements()
        .iter()
        .any(|d| d.name() == driver.name())
    {
        "predetermined"
    } else {
        ""
    }
}

pub fn execute(args: DriversArgs, format: OutputFormat) -> CliResult<()> {
    let session = session_file::open_session(&args.session, &[])?;

    let rows: Vec<DriverRow> = session
        .analysis()
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(i, driver)| DriverRow {
            rank: i + 1,
            driver: driver.name().to_string(),
            states: driver.states().join(", "),
            uncertainty: driver.uncertainty().to_string(),
            impact: driver.impact().to_string(),
            criticality: driver.criticality(),
            role: role(driver, &session).to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&rows, format)?,
        OutputFormat::Table => {
            output::print_heading("Driver Ranking");
            let total = rows.len();
            output::print_table(rows);
            println!();
            println!(
                "Total: {} driver(s), {} used as matrix axes",
                total,
                session.matrix().drivers().len().to_string().bold()
            );
        }
    }
    Ok(())
}

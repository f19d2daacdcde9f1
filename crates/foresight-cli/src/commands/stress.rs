//! Strategy stress testing

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use colored::Colorize;
use foresight_core::WeightingMode;
use tabled::Tabled;
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::session_file;

#[derive(Args, Debug)]
pub struct StressArgs {
    /// Session file (yaml, json or toml)
    pub session: PathBuf,

    /// Mark a signpost as observed before testing (repeatable)
    #[arg(short, long = "trigger", value_name = "DESCRIPTION")]
    pub triggers: Vec<String>,

    /// How portfolio weights are read; defaults to config, then the session file
    #[arg(short, long)]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Weights must sum to 1
    Normalized,
    /// Weights are read on their own
    Independent,
}

impl From<ModeArg> for WeightingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normalized => WeightingMode::Normalized,
            ModeArg::Independent => WeightingMode::Independent,
        }
    }
}

#[derive(Tabled)]
struct RobustnessRow {
    strategy: String,
    weight: f64,
    expected: String,
    worst: String,
    best: String,
    spread: String,
}

pub fn execute(args: StressArgs, format: OutputFormat, config: &CliConfig) -> CliResult<()> {
    let mut session = session_file::open_session(&args.session, &args.triggers)?;
    session_file::apply_mode(&mut session, args.mode.map(WeightingMode::from), config);

    let report = session.stress_test_default()?;
    info!(
        policy = %report.policy,
        strategies = report.strategies.len(),
        "Robustness report ready"
    );

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&report, format)?,
        OutputFormat::Table => {
            output::print_heading(&format!(
                "Strategy Robustness ({} scoring, {} weights)",
                report.policy, report.mode
            ));
            let rows: Vec<RobustnessRow> = report
                .strategies
                .iter()
                .map(|s| RobustnessRow {
                    strategy: s.strategy.clone(),
                    weight: s.portfolio_weight,
                    expected: format!("{:.3}", s.expected),
                    worst: format!("{:.3} ({})", s.worst_case.score, s.worst_case.scenario),
                    best: format!("{:.3} ({})", s.best_case.score, s.best_case.scenario),
                    spread: format!("{:.3}", s.spread),
                })
                .collect();
            output::print_table(rows);
            println!();

            match report.most_robust() {
                Some(s) => output::print_success(&format!(
                    "Most robust: {} (worst case {:.3})",
                    s.strategy.bold(),
                    s.worst_case.score
                )),
                None => output::print_warning("No strategies registered in this session"),
            }
            if let Some(s) = report.best_expected() {
                output::print_info(&format!(
                    "Best expected value: {} ({:.3})",
                    s.strategy.bold(),
                    s.expected
                ));
            }
        }
    }
    Ok(())
}

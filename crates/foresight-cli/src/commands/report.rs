//! Full session report

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use foresight_core::WeightingMode;

use crate::commands::stress::ModeArg;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::session_file;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Session file (yaml, json or toml)
    pub session: PathBuf,

    /// Mark a signpost as observed before reporting (repeatable)
    #[arg(short, long = "trigger", value_name = "DESCRIPTION")]
    pub triggers: Vec<String>,

    /// How portfolio weights are read; defaults to config, then the session file
    #[arg(short, long)]
    pub mode: Option<ModeArg>,
}

pub fn execute(args: ReportArgs, format: OutputFormat, config: &CliConfig) -> CliResult<()> {
    let mut session = session_file::open_session(&args.session, &args.triggers)?;
    session_file::apply_mode(&mut session, args.mode.map(WeightingMode::from), config);
    let report = session.report()?;

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&report, format)?,
        OutputFormat::Table => {
            let title = report.title.as_deref().unwrap_or("Untitled session");
            output::print_heading(title);
            println!("  {} {}", "Session:".bold(), report.session_id);
            println!("  {} {}", "Generated:".bold(), report.generated_at.to_rfc3339());
            println!();

            println!("{}", "Axes".bold());
            for driver in &report.drivers {
                println!("  {} [{}]", driver.name(), driver.states().join(" | ").dimmed());
            }
            if !report.predetermined_elements.is_empty() {
                println!("{}", "Predetermined elements".bold());
                for name in &report.predetermined_elements {
                    println!("  {}", name);
                }
            }
            println!();

            println!("{}", "Scenarios".bold());
            for scenario in &report.scenarios {
                println!(
                    "  {:>6}  {}",
                    output::percent(scenario.probability),
                    scenario.name
                );
            }
            println!();

            let triggered = report.signposts.iter().filter(|s| s.is_triggered()).count();
            println!(
                "{} {} of {} triggered",
                "Signposts".bold(),
                triggered,
                report.signposts.len()
            );
            for signpost in report.signposts.iter().filter(|s| s.is_triggered()) {
                println!("  {} {} -> {}", "✓".green(), signpost.description, signpost.target_scenario);
            }

            if let Some(robustness) = &report.robustness {
                println!();
                println!("{} ({} scoring)", "Strategies".bold(), robustness.policy);
                for s in &robustness.strategies {
                    println!(
                        "  {:<20} expected {:>8.3}  worst {:>8.3}  best {:>8.3}",
                        s.strategy, s.expected, s.worst_case.score, s.best_case.score
                    );
                }
                if let Some(s) = robustness.most_robust() {
                    output::print_success(&format!("Most robust: {}", s.strategy));
                }
            }
        }
    }
    Ok(())
}

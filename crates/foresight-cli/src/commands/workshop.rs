//! Workshop agenda planning

use std::time::Duration;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};

/// Shortest workshop the agenda can be split into.
pub const MIN_WORKSHOP_MINUTES: u64 = 30;

/// Phases in running order with their relative share of the time.
const PHASES: [(&str, &str, u64); 7] = [
    ("Framing", "Agree the focal question, horizon and scope", 1),
    ("Driver brainstorm", "Collect external forces with their possible states", 3),
    ("Driver ranking", "Rate uncertainty and impact, pick the axes", 2),
    ("Matrix build", "Generate the matrix and name each scenario", 2),
    ("Narratives", "Breakout groups write assumptions and stories", 4),
    ("Signposts", "Define observable early indicators per scenario", 2),
    ("Stress test", "Score candidate strategies across the scenarios", 3),
];

/// Index of the phase that absorbs rounding leftovers.
const NARRATIVES: usize = 4;

#[derive(Args, Debug)]
pub struct WorkshopArgs {
    /// Number of participants
    #[arg(short, long)]
    pub participants: usize,

    /// Total duration, e.g. "3h" or "90min"
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Planning domain, e.g. "energy transition"
    #[arg(long)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct AgendaPhase {
    #[tabled(rename = "#")]
    pub order: usize,
    pub phase: String,
    pub minutes: u64,
    pub activity: String,
}

#[derive(Debug, Serialize)]
pub struct Agenda {
    pub domain: String,
    pub participants: usize,
    pub total_minutes: u64,
    pub breakout_groups: usize,
    pub phases: Vec<AgendaPhase>,
}

/// Validate the arguments and lay out the agenda.
pub fn plan(args: &WorkshopArgs, config: &CliConfig) -> CliResult<Agenda> {
    if args.participants == 0 {
        return Err(CliError::InvalidArgument(
            "a workshop needs at least one participant".into(),
        ));
    }

    let domain = args
        .domain
        .clone()
        .or_else(|| config.default_domain.clone())
        .unwrap_or_default();
    if domain.trim().is_empty() {
        return Err(CliError::InvalidArgument("domain must not be empty".into()));
    }

    let total_minutes = args.duration.as_secs() / 60;
    if total_minutes < MIN_WORKSHOP_MINUTES {
        return Err(CliError::InvalidArgument(format!(
            "workshop must last at least {} minutes, got {}",
            MIN_WORKSHOP_MINUTES,
            humantime::format_duration(args.duration)
        )));
    }

    let share_sum: u64 = PHASES.iter().map(|(_, _, share)| share).sum();
    let mut phases: Vec<AgendaPhase> = PHASES
        .iter()
        .enumerate()
        .map(|(i, (phase, activity, share))| AgendaPhase {
            order: i + 1,
            phase: phase.to_string(),
            minutes: total_minutes * share / share_sum,
            activity: activity.to_string(),
        })
        .collect();
    let allocated: u64 = phases.iter().map(|p| p.minutes).sum();
    phases[NARRATIVES].minutes += total_minutes - allocated;

    let group_size = config.group_size();
    let breakout_groups = args.participants.div_ceil(group_size).max(1);

    debug!(
        participants = args.participants,
        total_minutes, breakout_groups, "Workshop agenda planned"
    );

    Ok(Agenda {
        domain: domain.trim().to_string(),
        participants: args.participants,
        total_minutes,
        breakout_groups,
        phases,
    })
}

pub fn execute(args: WorkshopArgs, format: OutputFormat, config: &CliConfig) -> CliResult<()> {
    let agenda = plan(&args, config)?;

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&agenda, format)?,
        OutputFormat::Table => {
            output::print_heading(&format!("Scenario workshop: {}", agenda.domain));
            println!(
                "  {} participants, {} breakout group(s), {} minutes",
                agenda.participants.to_string().bold(),
                agenda.breakout_groups.to_string().bold(),
                agenda.total_minutes.to_string().bold()
            );
            println!();
            output::print_table(agenda.phases);
        }
    }
    Ok(())
}

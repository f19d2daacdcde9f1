//! Foresight CLI entry point

use colored::Colorize;

fn main() {
    if let Err(err) = foresight_cli::run() {
        eprintln!("{} {}", "✗".red(), err);
        std::process::exit(1);
    }
}

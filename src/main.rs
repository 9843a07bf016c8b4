use RustedGrapher::app::commands::{CommandError, Outcome, execute, help_text, parse_command};
use RustedGrapher::app::config::PlotterConfig;
use RustedGrapher::app::logger::init_logger;
use RustedGrapher::app::state::PlotterState;
use clap::Parser;
use log::{LevelFilter, error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Interactive function plotter: type formulas in x, pan the view, export the chart.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// overrides the configured level: off, error, warn, info, debug, trace
    #[arg(short, long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,
    /// seed for plot and critical point colors
    #[arg(short, long)]
    seed: Option<u64>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(s).map_err(|_| format!("unknown log level '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => match PlotterConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => PlotterConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.seed.is_some() {
        config.color_seed = cli.seed;
    }
    init_logger(config.log_level, config.log_file_path().as_deref());
    info!("session started with {:?}", config);

    let mut state = PlotterState::from_config(&config);
    println!("{}", help_text());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("cannot read input: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match execute(&mut state, command, &config) {
            Ok(Outcome::Continue(text)) if text.is_empty() => {}
            Ok(Outcome::Continue(text)) => println!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("{}", e),
        }
        let _ = stdout.flush();
    }
    info!("session ended");
    ExitCode::SUCCESS
}

//! Line oriented command language of the interactive session.
//!
//! One line is one user action:
//! ```text
//! add x^2 - 3x        edit 0 sin(x)      delete 0       color 0       color-point 1
//! bounds -5 5 -2 8    step 0.25          drag 25 -10    list          points
//! samples 0           export out.png     csv out.csv    help          quit
//! ```
use crate::app::config::PlotterConfig;
use crate::app::state::{PlotterState, StateError};
use crate::plotting::export::{ExportError, save_samples_to_csv};
use crate::plotting::render::{RenderOptions, render_chart};
use crate::plotting::viewport::DragEvent;
use crate::symbolic::evaluator::Evaluator;
use itertools::Itertools;
use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, rest},
    number::complete::double,
    sequence::preceded,
};
use std::fmt;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    Edit { id: usize, formula: String },
    Delete(usize),
    Color(usize),
    ColorPoint(usize),
    Bounds {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    Step(f64),
    Drag { dx: f64, dy: f64 },
    List,
    Points,
    Samples(usize),
    /// path defaults to the configured export path
    Export(Option<PathBuf>),
    Csv(PathBuf),
    Help,
    Quit,
}

/// name, usage, description
const COMMANDS: [(&str, &str, &str); 15] = [
    ("add", "add <expr>", "plot a new function of x"),
    ("edit", "edit <id> <expr>", "replace the formula of a plot"),
    ("delete", "delete <id>", "remove a plot"),
    ("color", "color <id>", "give a plot a new random color"),
    ("color-point", "color-point <index>", "give a critical point a new random color"),
    ("bounds", "bounds <xmin> <xmax> <ymin> <ymax>", "set the view"),
    ("step", "step <value>", "set the sampling interval (> 0)"),
    ("drag", "drag <dx> <dy>", "pan the view as a mouse drag of dx, dy pixels"),
    ("list", "list", "show the plots"),
    ("points", "points", "show the critical points"),
    ("samples", "samples <id>", "show the sampled points of a plot"),
    ("export", "export [path]", "save the chart as an image"),
    ("csv", "csv <path>", "save the sampled points as csv"),
    ("help", "help", "show this list"),
    ("quit", "quit", "end the session"),
];

#[derive(Debug)]
pub enum CommandError {
    Empty,
    Unknown(String),
    /// arguments did not match, holds the usage line
    Usage(&'static str),
    State(StateError),
    Export(ExportError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(name) => {
                write!(f, "unknown command '{}', type 'help' for the list", name)
            }
            CommandError::Usage(usage) => write!(f, "usage: {}", usage),
            CommandError::State(e) => write!(f, "{}", e),
            CommandError::Export(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<StateError> for CommandError {
    fn from(e: StateError) -> Self {
        CommandError::State(e)
    }
}

impl From<ExportError> for CommandError {
    fn from(e: ExportError) -> Self {
        CommandError::Export(e)
    }
}

fn command_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '-').parse(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    preceded(space1, map_res(digit1, |s: &str| s.parse::<usize>())).parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    preceded(space1, double).parse(input)
}

/// everything after the separating blanks
fn text(input: &str) -> IResult<&str, &str> {
    preceded(space1, rest).map(|s: &str| s.trim()).parse(input)
}

fn end(input: &str) -> IResult<&str, &str> {
    all_consuming(space0).parse(input)
}

fn usage(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map_or("help", |(_, usage, _)| usage)
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (args, name) = command_name(line).map_err(|_| CommandError::Unknown(line.to_string()))?;
    let parsed = match name {
        "add" => all_consuming(text)
            .map(|f| Command::Add(f.to_string()))
            .parse(args),
        "edit" => all_consuming((index, text))
            .map(|(id, f)| Command::Edit {
                id,
                formula: f.to_string(),
            })
            .parse(args),
        "delete" => (index, end).map(|(id, _)| Command::Delete(id)).parse(args),
        "color" => (index, end).map(|(id, _)| Command::Color(id)).parse(args),
        "color-point" => (index, end).map(|(i, _)| Command::ColorPoint(i)).parse(args),
        "bounds" => (number, number, number, number, end)
            .map(|(x_min, x_max, y_min, y_max, _)| Command::Bounds {
                x_min,
                x_max,
                y_min,
                y_max,
            })
            .parse(args),
        "step" => (number, end).map(|(v, _)| Command::Step(v)).parse(args),
        "drag" => (number, number, end)
            .map(|(dx, dy, _)| Command::Drag { dx, dy })
            .parse(args),
        "list" => end.map(|_| Command::List).parse(args),
        "points" => end.map(|_| Command::Points).parse(args),
        "samples" => (index, end).map(|(id, _)| Command::Samples(id)).parse(args),
        "export" => all_consuming(opt(text))
            .map(|p| Command::Export(p.filter(|p| !p.is_empty()).map(PathBuf::from)))
            .parse(args),
        "csv" => all_consuming(text)
            .map(|p| Command::Csv(PathBuf::from(p)))
            .parse(args),
        "help" => end.map(|_| Command::Help).parse(args),
        "quit" | "exit" => end.map(|_| Command::Quit).parse(args),
        _ => return Err(CommandError::Unknown(name.to_string())),
    };
    parsed
        .map(|(_, command)| command)
        .map_err(|_| CommandError::Usage(usage(name)))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// text to show, possibly empty
    Continue(String),
    Quit,
}

#[derive(Tabled)]
struct PointRow {
    index: usize,
    x: f64,
    y: f64,
    color: String,
}

#[derive(Tabled)]
struct SampleRow {
    x: f64,
    y: f64,
}

pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(_, usage, description)| format!("  {:<36} {}", usage, description))
        .join("\n")
}

fn plots_text<E: Evaluator>(state: &PlotterState<E>) -> String {
    if state.plots().is_empty() {
        return "no plots".to_string();
    }
    state
        .plots()
        .iter()
        .map(|p| format!("[{}] {}  {}", p.id, p.formula, p.color))
        .join("\n")
}

fn points_text<E: Evaluator>(state: &PlotterState<E>) -> String {
    let Some(formula) = state.active_formula() else {
        return "no critical points".to_string();
    };
    if state.critical_points().is_empty() {
        return format!("no critical points of {}", formula);
    }
    let rows: Vec<PointRow> = state
        .critical_points()
        .iter()
        .enumerate()
        .map(|(index, p)| PointRow {
            index,
            x: p.x,
            y: p.y,
            color: p.color.clone(),
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    format!("critical points of {}\n{}", formula, table)
}

/// Runs one command against the session.
pub fn execute<E: Evaluator>(
    state: &mut PlotterState<E>,
    command: Command,
    config: &PlotterConfig,
) -> Result<Outcome, CommandError> {
    let text = match command {
        Command::Add(formula) => {
            let id = state.add_plot(&formula)?;
            let mut text = format!("[{}] {}", id, formula);
            // the plot stays even if the scan failed
            if let Some(error) = state.error() {
                text = format!("{}\n{}", text, error);
            }
            text
        }
        Command::Edit { id, formula } => {
            state.edit_formula(id, &formula)?;
            format!("[{}] {}", id, formula)
        }
        Command::Delete(id) => {
            let plot = state.delete_plot(id)?;
            format!("deleted [{}] {}", plot.id, plot.formula)
        }
        Command::Color(id) => state.recolor_plot(id)?,
        Command::ColorPoint(index) => state.recolor_critical_point(index)?,
        Command::Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            state.set_bounds(x_min, x_max, y_min, y_max)?;
            let v = state.viewport();
            format!("x: [{}, {}]  y: [{}, {}]", v.x_min, v.x_max, v.y_min, v.y_max)
        }
        Command::Step(step) => {
            state.set_step(step)?;
            format!("step {}", state.step())
        }
        Command::Drag { dx, dy } => {
            state.drag(&DragEvent::primary(dx, dy));
            let v = state.viewport();
            format!("x: [{}, {}]  y: [{}, {}]", v.x_min, v.x_max, v.y_min, v.y_max)
        }
        Command::List => plots_text(state),
        Command::Points => points_text(state),
        Command::Samples(id) => {
            let rows: Vec<SampleRow> = state
                .samples_for(id)?
                .into_iter()
                .map(|s| SampleRow { x: s.x, y: s.y })
                .collect();
            let mut table = Table::new(&rows);
            table.with(Style::modern_rounded());
            table.to_string()
        }
        Command::Export(path) => {
            let path = path.unwrap_or_else(|| config.export_path.clone());
            let options = RenderOptions {
                size: config.export_size,
                ..RenderOptions::default()
            };
            render_chart(&state.chart_data(), &path, &options)?;
            format!("saved {}", path.display())
        }
        Command::Csv(path) => {
            save_samples_to_csv(&state.chart_data(), &path)?;
            format!("saved {}", path.display())
        }
        Command::Help => help_text(),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Continue(text))
}

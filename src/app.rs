//! interactive session: settings, logging, session state and the command language
/// TOML settings with defaults for every key
pub mod config;
/// terminal and file logging with simplelog
pub mod logger;
/// session state; every change goes through an action method
///# Example
/// ```
/// use RustedGrapher::app::state::PlotterState;
/// use RustedGrapher::plotting::color::ColorGenerator;
/// use RustedGrapher::symbolic::evaluator::SymbolicEvaluator;
/// let mut state = PlotterState::new(SymbolicEvaluator::default(), ColorGenerator::seeded(0));
/// let id = state.add_plot("x^2").unwrap();
/// assert_eq!(state.samples_for(id).unwrap().len(), 41);
/// assert_eq!(state.critical_points()[0].x, 0.0);
/// ```
pub mod state;
/// one line, one command
pub mod commands;

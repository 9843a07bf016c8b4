//! Session state of the plotter.
//!
//! `PlotterState` owns the plots, the viewport, the sampling step, the critical points of the
//! last submitted or edited formula, the color generator and the last error shown to the user.
//! Every change goes through one of the action methods, which keep the invariants:
//! plot ids are unique and never reused, the step is always positive and the viewport
//! bounds are always finite.
use crate::app::config::{DEFAULT_STEP, PlotterConfig};
use crate::plotting::chart_data::{ChartData, Dataset};
use crate::plotting::color::ColorGenerator;
use crate::plotting::critical_points::{CriticalPoint, find_critical_points};
use crate::plotting::grid::{Grid, GridError};
use crate::plotting::sampler::{Sample, normalize_formula, sample};
use crate::plotting::viewport::{DEFAULT_DRAG_SPEED, DragEvent, Viewport};
use crate::symbolic::evaluator::{Evaluator, FormulaError, SymbolicEvaluator};
use log::{debug, info, warn};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub id: usize,
    pub formula: String,
    /// `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    UnknownPlot(usize),
    UnknownCriticalPoint(usize),
    InvalidStep(f64),
    NonFiniteBounds,
    Formula(FormulaError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StateError::UnknownPlot(id) => write!(f, "no plot with id {}", id),
            StateError::UnknownCriticalPoint(index) => {
                write!(f, "no critical point with index {}", index)
            }
            StateError::InvalidStep(step) => {
                write!(f, "interval must be greater than 0, got {}", step)
            }
            StateError::NonFiniteBounds => write!(f, "bounds must be finite numbers"),
            StateError::Formula(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StateError {}

impl From<FormulaError> for StateError {
    fn from(e: FormulaError) -> Self {
        StateError::Formula(e)
    }
}

pub struct PlotterState<E: Evaluator = SymbolicEvaluator> {
    evaluator: E,
    plots: Vec<Plot>,
    next_id: usize,
    viewport: Viewport,
    step: f64,
    drag_speed: f64,
    /// formula the critical points belong to
    active_formula: Option<String>,
    critical_points: Vec<CriticalPoint>,
    colors: ColorGenerator,
    error: Option<String>,
}

impl Default for PlotterState<SymbolicEvaluator> {
    fn default() -> Self {
        Self::new(SymbolicEvaluator::default(), ColorGenerator::from_entropy())
    }
}

impl PlotterState<SymbolicEvaluator> {
    pub fn from_config(config: &PlotterConfig) -> Self {
        let colors = match config.color_seed {
            Some(seed) => ColorGenerator::seeded(seed),
            None => ColorGenerator::from_entropy(),
        };
        let mut state = Self::new(SymbolicEvaluator::default(), colors);
        let vp = config.viewport;
        if let Err(e) = state.set_bounds(vp.x_min, vp.x_max, vp.y_min, vp.y_max) {
            warn!("configured viewport ignored: {}", e);
        }
        if let Err(e) = state.set_step(config.step) {
            warn!("configured step ignored: {}", e);
        }
        if config.drag_speed.is_finite() && config.drag_speed > 0.0 {
            state.drag_speed = config.drag_speed;
        } else {
            warn!("configured drag speed {} ignored", config.drag_speed);
        }
        state
    }
}

impl<E: Evaluator> PlotterState<E> {
    pub fn new(evaluator: E, colors: ColorGenerator) -> Self {
        Self {
            evaluator,
            plots: Vec::new(),
            next_id: 0,
            viewport: Viewport::default(),
            step: DEFAULT_STEP,
            drag_speed: DEFAULT_DRAG_SPEED,
            active_formula: None,
            critical_points: Vec::new(),
            colors,
            error: None,
        }
    }

    // ---------------------------------------------------------------------------------
    // actions
    // ---------------------------------------------------------------------------------

    /// Adds a plot for `formula` and returns its id.
    ///
    /// The formula must be accepted by the evaluator, otherwise nothing is added. If it
    /// parses but cannot be differentiated, the plot is still added; the error is reported
    /// and the previous critical points are kept.
    pub fn add_plot(&mut self, formula: &str) -> Result<usize, StateError> {
        let formula = formula.trim();
        if let Err(e) = self.check_formula(formula) {
            return Err(self.fail(e));
        }
        let id = self.next_id;
        self.next_id += 1;
        let color = self.colors.next_color();
        info!("plot {} added: {} ({})", id, formula, color);
        self.plots.push(Plot {
            id,
            formula: formula.to_string(),
            color,
        });
        self.error = None;
        if let Err(e) = self.activate(formula) {
            self.fail(e);
        }
        Ok(id)
    }

    /// Replaces the formula of a plot, as typed. The text is stored even when it is not a
    /// valid formula; in that case the error is reported and the critical points of the
    /// previous formula are kept.
    pub fn edit_formula(&mut self, id: usize, formula: &str) -> Result<(), StateError> {
        let plot = self
            .plots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StateError::UnknownPlot(id))?;
        plot.formula = formula.to_string();
        debug!("plot {} edited: {}", id, formula);
        let formula = formula.trim();
        if let Err(e) = self.check_formula(formula).and_then(|_| self.activate(formula)) {
            return Err(self.fail(e));
        }
        self.error = None;
        Ok(())
    }

    pub fn delete_plot(&mut self, id: usize) -> Result<Plot, StateError> {
        let position = self
            .plots
            .iter()
            .position(|p| p.id == id)
            .ok_or(StateError::UnknownPlot(id))?;
        let plot = self.plots.remove(position);
        info!("plot {} deleted: {}", plot.id, plot.formula);
        Ok(plot)
    }

    /// New random color for a plot; returns it.
    pub fn recolor_plot(&mut self, id: usize) -> Result<String, StateError> {
        let plot = self
            .plots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StateError::UnknownPlot(id))?;
        plot.color = self.colors.next_color();
        Ok(plot.color.clone())
    }

    pub fn recolor_critical_point(&mut self, index: usize) -> Result<String, StateError> {
        let point = self
            .critical_points
            .get_mut(index)
            .ok_or(StateError::UnknownCriticalPoint(index))?;
        point.color = self.colors.next_color();
        Ok(point.color.clone())
    }

    /// Sets the view bounds (rounded to integers). A change of the x-range resamples and
    /// rescans the active formula.
    pub fn set_bounds(
        &mut self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<(), StateError> {
        if [x_min, x_max, y_min, y_max].iter().any(|v| !v.is_finite()) {
            return Err(StateError::NonFiniteBounds);
        }
        let x_range = self.viewport.x_range();
        self.viewport.set_bounds(x_min, x_max, y_min, y_max);
        debug!("viewport set to {:?}", self.viewport);
        if self.viewport.x_range() != x_range {
            self.rescan();
        }
        Ok(())
    }

    /// Sets the sampling step; values that are not greater than zero are rejected and the
    /// previous step is kept.
    pub fn set_step(&mut self, step: f64) -> Result<(), StateError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(StateError::InvalidStep(step));
        }
        if step != self.step {
            self.step = step;
            debug!("step set to {}", step);
            self.rescan();
        }
        Ok(())
    }

    /// Pans the view for one pointer move. Returns true if the viewport changed.
    pub fn drag(&mut self, event: &DragEvent) -> bool {
        let before = self.viewport;
        if !self.viewport.drag(event, self.drag_speed) {
            return false;
        }
        if self.viewport.x_range() != before.x_range() {
            self.rescan();
        }
        self.viewport != before
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ---------------------------------------------------------------------------------
    // queries
    // ---------------------------------------------------------------------------------

    /// last error shown to the user
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn plot(&self, id: usize) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id == id)
    }

    pub fn critical_points(&self) -> &[CriticalPoint] {
        &self.critical_points
    }

    pub fn active_formula(&self) -> Option<&str> {
        self.active_formula.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn drag_speed(&self) -> f64 {
        self.drag_speed
    }

    /// sampling grid over the current x-range
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.viewport.x_min, self.viewport.x_max, self.step)
    }

    pub fn samples_for(&self, id: usize) -> Result<Vec<Sample>, StateError> {
        let plot = self.plot(id).ok_or(StateError::UnknownPlot(id))?;
        Ok(self.samples_of(&plot.formula))
    }

    /// One line dataset per plot followed by the critical points dataset
    pub fn chart_data(&self) -> ChartData {
        let grid = self.grid().ok();
        let mut chart = ChartData::new(grid.as_ref(), &self.viewport);
        for plot in &self.plots {
            let samples = self.samples_of(&plot.formula);
            chart.push(Dataset::line(&plot.formula, samples, &plot.color));
        }
        chart.push(Dataset::critical_points(&self.critical_points));
        chart
    }

    // ---------------------------------------------------------------------------------
    // internals
    // ---------------------------------------------------------------------------------

    fn samples_of(&self, formula: &str) -> Vec<Sample> {
        match self.grid() {
            Ok(grid) => sample(&self.evaluator, formula, &grid),
            Err(e) => {
                warn!("cannot sample '{}': {}", formula, e);
                Vec::new()
            }
        }
    }

    fn check_formula(&self, formula: &str) -> Result<(), FormulaError> {
        if formula.is_empty() {
            return Err(FormulaError::Empty);
        }
        self.evaluator.validate(&normalize_formula(formula))
    }

    /// records a formula error as the visible error
    fn fail(&mut self, e: FormulaError) -> StateError {
        warn!("{}", e);
        self.error = Some(e.to_string());
        StateError::Formula(e)
    }

    /// Scans `formula` and makes it the active one. On failure nothing changes.
    fn activate(&mut self, formula: &str) -> Result<(), FormulaError> {
        let points = self.scan(formula)?;
        self.active_formula = Some(formula.to_string());
        self.critical_points = points;
        Ok(())
    }

    fn scan(&mut self, formula: &str) -> Result<Vec<CriticalPoint>, FormulaError> {
        match self.grid() {
            Ok(grid) => find_critical_points(&self.evaluator, formula, &grid, &mut self.colors),
            Err(e) => {
                warn!("cannot scan '{}': {}", formula, e);
                Ok(Vec::new())
            }
        }
    }

    /// recomputes the critical points of the active formula after the grid changed
    fn rescan(&mut self) {
        let Some(formula) = self.active_formula.clone() else {
            return;
        };
        match self.scan(&formula) {
            Ok(points) => self.critical_points = points,
            Err(e) => {
                self.fail(e);
            }
        }
    }
}

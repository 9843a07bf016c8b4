//! Sample grid shared by the sampler and the critical point scanner.
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// step must be strictly positive, otherwise the grid never ends
    NonPositiveStep(f64),
    NonFiniteBound { x_min: f64, x_max: f64 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::NonPositiveStep(step) => {
                write!(f, "grid step must be positive, got {}", step)
            }
            GridError::NonFiniteBound { x_min, x_max } => {
                write!(f, "grid bounds must be finite, got [{}, {}]", x_min, x_max)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Ordered x-values `x_min, x_min + step, x_min + 2*step, ...` up to and including `x_max`.
///
/// Values are produced by repeated addition, so floating point drift accumulates exactly
/// as it does when the user steps through the interval. An inverted interval is valid
/// and simply produces no points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    x_min: f64,
    x_max: f64,
    step: f64,
}

impl Grid {
    pub fn new(x_min: f64, x_max: f64, step: f64) -> Result<Self, GridError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GridError::NonPositiveStep(step));
        }
        if !x_min.is_finite() || !x_max.is_finite() {
            return Err(GridError::NonFiniteBound { x_min, x_max });
        }
        Ok(Self { x_min, x_max, step })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// fresh iterator on every call
    pub fn iter(&self) -> GridIter {
        GridIter {
            next: self.x_min,
            x_max: self.x_max,
            step: self.step,
        }
    }

    pub fn points(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = f64;
    type IntoIter = GridIter;

    fn into_iter(self) -> GridIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct GridIter {
    next: f64,
    x_max: f64,
    step: f64,
}

impl Iterator for GridIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.x_max {
            return None;
        }
        let current = self.next;
        let advanced = current + self.step;
        // a step below the resolution of f64 at this magnitude would never advance
        self.next = if advanced > current {
            advanced
        } else {
            f64::INFINITY
        };
        Some(current)
    }
}

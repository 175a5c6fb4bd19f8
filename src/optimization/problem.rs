use std::fmt;

use nalgebra::{DMatrix, DVector};

pub trait Problem {
    // Number of decision variables
    fn n_var(&self) -> usize;

    // Number of objectives
    fn n_obj(&self) -> usize;

    // Lower and upper bounds of the decision variables
    fn bounds(&self) -> (DVector<f64>, DVector<f64>);

    // Evaluate a batch of samples (one per row), returning one row of objectives per sample
    fn evaluate(&self, samples: &DMatrix<f64>) -> Result<DMatrix<f64>, ProblemError>;

    // Unconstrained unless overridden
    fn constraint_violation(&self, _x: &DVector<f64>) -> f64 {
        0.0
    }
}

/// Problem backed by a plain objective closure.
pub struct FunctionProblem<'a> {
    lower: DVector<f64>,
    upper: DVector<f64>,
    n_obj: usize,
    function: Box<dyn Fn(&[f64]) -> Vec<f64> + 'a>,
}

impl<'a> FunctionProblem<'a> {
    pub fn new<F>(lower: Vec<f64>, upper: Vec<f64>, n_obj: usize, function: F) -> Result<Self, ProblemError>
    where
        F: Fn(&[f64]) -> Vec<f64> + 'a,
    {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(ProblemError::InvalidBounds);
        }

        if lower.iter().zip(upper.iter()).any(|(lo, hi)| lo > hi) {
            return Err(ProblemError::InvalidBounds);
        }

        Ok(Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
            n_obj,
            function: Box::new(function),
        })
    }

    /// One variable in `[lo, hi]`, one objective.
    pub fn new_scalar<F>(lo: f64, hi: f64, function: F) -> Result<Self, ProblemError>
    where
        F: Fn(f64) -> f64 + 'a,
    {
        Self::new(vec![lo], vec![hi], 1, move |x: &[f64]| vec![function(x[0])])
    }
}

impl<'a> Problem for FunctionProblem<'a> {
    fn n_var(&self) -> usize {
        self.lower.len()
    }

    fn n_obj(&self) -> usize {
        self.n_obj
    }

    fn bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (self.lower.clone(), self.upper.clone())
    }

    fn evaluate(&self, samples: &DMatrix<f64>) -> Result<DMatrix<f64>, ProblemError> {
        if samples.ncols() != self.n_var() {
            return Err(ProblemError::DimensionMismatch { expected: self.n_var(), found: samples.ncols() });
        }

        let mut objectives = DMatrix::<f64>::zeros(samples.nrows(), self.n_obj);

        for (i, row) in samples.row_iter().enumerate() {
            let sample: Vec<f64> = row.iter().copied().collect();
            let values = (self.function)(&sample);

            if values.len() != self.n_obj {
                return Err(ProblemError::EvaluationFailed {
                    reason: format!("expected {} objective values, got {}", self.n_obj, values.len()),
                });
            }

            for (j, value) in values.into_iter().enumerate() {
                objectives[(i, j)] = value;
            }
        }

        Ok(objectives)
    }
}

/// `n` evenly spaced values from `lo` to `hi`, both included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            // Pin the last sample so rounding never misses the upper bound
            (0..n).map(|i| if i == n - 1 { hi } else { lo + step * i as f64 }).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    InvalidBounds,
    DimensionMismatch { expected: usize, found: usize },
    EvaluationFailed { reason: String },
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProblemError::InvalidBounds => write!(f, "invalid variable bounds"),
            ProblemError::DimensionMismatch { expected, found } => {
                write!(f, "expected {} decision variables per sample, found {}", expected, found)
            }
            ProblemError::EvaluationFailed { reason } => write!(f, "evaluation failed: {}", reason),
        }
    }
}

impl std::error::Error for ProblemError {}

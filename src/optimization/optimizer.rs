use std::fmt;

use super::algorithm::{AlgorithmState, Callback};
use super::individual::Individual;
use super::population::PopulationError;
use super::problem::ProblemError;

pub trait Optimizer: AlgorithmState {
    // Sample and evaluate the initial population (generation 1)
    fn initialize(&mut self) -> Result<(), OptimizerError>;

    // Execute a single generation: variation, evaluation, survival
    fn step(&mut self) -> Result<(), OptimizerError>;

    // Run up to the given number of generations, the initial one included
    fn run(&mut self, max_generations: usize) -> Result<(), OptimizerError> {
        self.initialize()?;

        while self.n_gen() < max_generations {
            self.step()?;
        }

        Ok(())
    }

    // Same as run, notifying the callback after every generation
    fn run_with_callback<C>(&mut self, max_generations: usize, callback: &mut C) -> Result<(), OptimizerError>
    where
        C: Callback,
        C::Error: std::error::Error + 'static,
        Self: Sized,
    {
        self.initialize()?;
        callback.notify(&*self).map_err(|err| OptimizerError::CallbackFailed { err: Box::new(err) })?;

        while self.n_gen() < max_generations {
            self.step()?;
            callback.notify(&*self).map_err(|err| OptimizerError::CallbackFailed { err: Box::new(err) })?;
        }

        Ok(())
    }

    // Retrieves the best individual found so far
    fn get_best_solution(&self) -> Option<&Individual>;
}

#[derive(Debug)]
pub enum OptimizerError {
    NotInitialized,
    InvalidParameters { reason: String },
    ProblemError { err: ProblemError },
    PopulationError { err: PopulationError },
    CallbackFailed { err: Box<dyn std::error::Error> },
}

impl fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptimizerError::NotInitialized => write!(f, "optimizer has not been initialized"),
            OptimizerError::InvalidParameters { reason } => write!(f, "invalid parameters: {}", reason),
            OptimizerError::ProblemError { err } => write!(f, "problem error: {}", err),
            OptimizerError::PopulationError { err } => write!(f, "population error: {}", err),
            OptimizerError::CallbackFailed { err } => write!(f, "callback failed: {}", err),
        }
    }
}

impl std::error::Error for OptimizerError {}

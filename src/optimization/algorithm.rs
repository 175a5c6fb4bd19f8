use super::population::Population;
use super::problem::Problem;

/// What a callback can read from a running optimization.
pub trait AlgorithmState {
    fn problem(&self) -> &dyn Problem;

    fn population(&self) -> &Population;

    // Offspring produced in the current generation, if the algorithm has any
    fn offspring(&self) -> Option<&Population> {
        None
    }

    fn n_gen(&self) -> usize;
}

/// Hook invoked once per generation by the driving algorithm.
pub trait Callback {
    type Error;

    fn notify(&mut self, algorithm: &dyn AlgorithmState) -> Result<(), Self::Error>;
}

/// Borrowed algorithm state for drivers that keep their data elsewhere.
pub struct GenerationSnapshot<'a> {
    pub problem: &'a dyn Problem,
    pub population: &'a Population,
    pub offspring: Option<&'a Population>,
    pub n_gen: usize,
}

impl<'a> GenerationSnapshot<'a> {
    pub fn new(problem: &'a dyn Problem, population: &'a Population, n_gen: usize) -> Self {
        Self { problem, population, offspring: None, n_gen }
    }

    pub fn with_offspring(mut self, offspring: &'a Population) -> Self {
        self.offspring = Some(offspring);
        self
    }
}

impl<'a> AlgorithmState for GenerationSnapshot<'a> {
    fn problem(&self) -> &dyn Problem {
        self.problem
    }

    fn population(&self) -> &Population {
        self.population
    }

    fn offspring(&self) -> Option<&Population> {
        self.offspring
    }

    fn n_gen(&self) -> usize {
        self.n_gen
    }
}

use std::collections::HashSet;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use super::individual::{Individual, IndividualId};

#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn push(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    // Concatenate both populations, self first
    pub fn merge(&self, other: &Population) -> Population {
        let mut individuals = self.individuals.clone();
        individuals.extend(other.individuals.iter().cloned());
        Population::new(individuals)
    }

    pub fn get_x(&self) -> Result<DMatrix<f64>, PopulationError> {
        Self::stack_rows(self.individuals.iter().map(|ind| ind.x()))
    }

    pub fn get_f(&self) -> Result<DMatrix<f64>, PopulationError> {
        Self::stack_rows(self.individuals.iter().map(|ind| ind.f()))
    }

    pub fn get_cv(&self) -> DVector<f64> {
        DVector::from_iterator(self.len(), self.individuals.iter().map(|ind| ind.cv()))
    }

    /// Decision, objective and constraint-violation arrays, one row per individual.
    pub fn get_x_f_cv(&self) -> Result<(DMatrix<f64>, DMatrix<f64>, DVector<f64>), PopulationError> {
        Ok((self.get_x()?, self.get_f()?, self.get_cv()))
    }

    /// Keep the individuals whose mask entry is true, in order.
    pub fn select(&self, mask: &[bool]) -> Result<Population, PopulationError> {
        if mask.len() != self.len() {
            return Err(PopulationError::MaskLengthMismatch { expected: self.len(), found: mask.len() });
        }

        let selected = self.individuals
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(ind, _)| ind.clone())
            .collect();

        Ok(Population::new(selected))
    }

    pub fn ids(&self) -> HashSet<IndividualId> {
        self.individuals.iter().map(|ind| ind.id()).collect()
    }

    pub fn contains(&self, individual: &Individual) -> bool {
        self.individuals.iter().any(|ind| ind == individual)
    }

    fn stack_rows<'a, I>(rows: I) -> Result<DMatrix<f64>, PopulationError>
    where
        I: Iterator<Item = &'a DVector<f64>>,
    {
        let rows: Vec<&DVector<f64>> = rows.collect();

        let width = match rows.first() {
            Some(first) => first.len(),
            None => return Ok(DMatrix::zeros(0, 0)),
        };

        if rows.iter().any(|row| row.len() != width) {
            return Err(PopulationError::InconsistentDimensions);
        }

        Ok(DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j]))
    }
}

impl From<Vec<Individual>> for Population {
    fn from(individuals: Vec<Individual>) -> Self {
        Population::new(individuals)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopulationError {
    InconsistentDimensions,
    MaskLengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PopulationError::InconsistentDimensions => write!(f, "individuals have vectors of different lengths"),
            PopulationError::MaskLengthMismatch { expected, found } => {
                write!(f, "mask has {} entries but population has {} individuals", found, expected)
            }
        }
    }
}

impl std::error::Error for PopulationError {}

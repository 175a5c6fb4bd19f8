use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use super::algorithm::AlgorithmState;
use super::individual::Individual;
use super::optimizer::{Optimizer, OptimizerError};
use super::population::Population;
use super::problem::Problem;
use super::repair::BoundsRepair;
use super::tools::{compare_individuals, select_top_n};
use super::verbosity::{YapLevel, Yapper};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneticAlgorithmParameters {
    pub population_size: usize,
    pub offspring_size: usize,

    pub mutation_scale: f64, // Mutation std as a fraction of each variable's range
    pub crossover_probability: f64, // Chance of blending two parents instead of copying one
}

impl GeneticAlgorithmParameters {
    pub fn new(population_size: usize, offspring_size: usize, mutation_scale: f64, crossover_probability: f64) -> Self {
        Self { population_size, offspring_size, mutation_scale, crossover_probability }
    }

    // Scale the population with the number of variables, keep the rest fixed
    pub fn new_auto(n_var: usize) -> Self {
        let population_size = (10 * n_var).max(20);

        Self {
            population_size,
            offspring_size: population_size / 2,
            mutation_scale: 0.1,
            crossover_probability: 0.9,
        }
    }

    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.population_size == 0 {
            return Err(OptimizerError::InvalidParameters { reason: "population_size must be positive".to_string() });
        }
        if self.offspring_size == 0 {
            return Err(OptimizerError::InvalidParameters { reason: "offspring_size must be positive".to_string() });
        }
        if !(self.mutation_scale >= 0.0) {
            return Err(OptimizerError::InvalidParameters { reason: "mutation_scale must be non-negative".to_string() });
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(OptimizerError::InvalidParameters { reason: "crossover_probability must lie in [0, 1]".to_string() });
        }
        Ok(())
    }
}

impl Default for GeneticAlgorithmParameters {
    fn default() -> Self {
        Self::new_auto(1)
    }
}

/// (mu + lambda) genetic algorithm for single-objective problems.
pub struct GeneticAlgorithm<'a> {
    problem: Box<dyn Problem + 'a>,
    parameters: GeneticAlgorithmParameters,
    repair: BoundsRepair,
    rng: StdRng,

    population: Population,
    offspring: Option<Population>,
    best_solution: Option<Individual>,
    n_gen: usize,

    yapper: Yapper,
}

impl<'a> GeneticAlgorithm<'a> {
    pub fn new<P>(problem: P, parameters: GeneticAlgorithmParameters) -> Result<Self, OptimizerError>
    where
        P: Problem + 'a,
    {
        parameters.validate()?;

        let yapper = Yapper::new(None, problem.n_var(), &parameters, YapLevel::None);

        Ok(Self {
            problem: Box::new(problem),
            parameters,
            repair: BoundsRepair::Clamp,
            rng: StdRng::from_entropy(),
            population: Population::default(),
            offspring: None,
            best_solution: None,
            n_gen: 0,
            yapper,
        })
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_repair(&mut self, repair: BoundsRepair) {
        self.repair = repair;
    }

    pub fn set_verbosity(&mut self, yap_level: YapLevel, max_generations: Option<usize>) {
        self.yapper = Yapper::new(max_generations, self.problem.n_var(), &self.parameters, yap_level);
    }

    pub fn get_parameters(&self) -> &GeneticAlgorithmParameters {
        &self.parameters
    }

    // Evaluate a batch of unevaluated individuals in one call to the problem
    fn evaluate_individuals(&self, individuals: &mut [Individual]) -> Result<(), OptimizerError> {
        if individuals.is_empty() {
            return Ok(());
        }

        let n_var = self.problem.n_var();
        let samples = DMatrix::from_fn(individuals.len(), n_var, |i, j| individuals[i].x()[j]);

        let objectives = self.problem
            .evaluate(&samples)
            .map_err(|err| OptimizerError::ProblemError { err })?;

        for (i, individual) in individuals.iter_mut().enumerate() {
            let f = DVector::from_iterator(objectives.ncols(), objectives.row(i).iter().copied());
            let cv = self.problem.constraint_violation(individual.x());
            individual.set_evaluation(f, cv);
        }

        Ok(())
    }

    fn tournament<'p>(&mut self, population: &'p Population) -> &'p Individual {
        let a = &population.individuals()[self.rng.gen_range(0..population.len())];
        let b = &population.individuals()[self.rng.gen_range(0..population.len())];

        if compare_individuals(a, b).is_le() { a } else { b }
    }

    fn make_offspring(&mut self) -> Result<Vec<Individual>, OptimizerError> {
        let (lower, upper) = self.problem.bounds();
        let parents = self.population.clone();

        let mut offspring = Vec::with_capacity(self.parameters.offspring_size);

        for _ in 0..self.parameters.offspring_size {
            let first = self.tournament(&parents).x().clone();

            let mut child = if self.rng.gen_bool(self.parameters.crossover_probability) {
                let second = self.tournament(&parents).x().clone();
                let weight: f64 = self.rng.gen_range(0.0..=1.0);
                &first * weight + &second * (1.0 - weight)
            } else {
                first
            };

            for (i, value) in child.iter_mut().enumerate() {
                let std = self.parameters.mutation_scale * (upper[i] - lower[i]);
                if std > 0.0 {
                    let normal = Normal::new(0.0, std).map_err(|err| OptimizerError::InvalidParameters {
                        reason: format!("mutation distribution: {}", err),
                    })?;
                    *value += normal.sample(&mut self.rng);
                }
            }

            self.repair.repair(&mut child, &lower, &upper);
            offspring.push(Individual::unevaluated(child));
        }

        Ok(offspring)
    }

    fn update_best(&mut self) {
        let candidate = select_top_n(&self.population, 1).get(0).cloned();

        let improved = match (&self.best_solution, &candidate) {
            (None, _) => true,
            (Some(best), Some(candidate)) => compare_individuals(candidate, best).is_lt(),
            (Some(_), None) => false,
        };

        if improved {
            self.best_solution = candidate;
        }
    }
}

impl<'a> AlgorithmState for GeneticAlgorithm<'a> {
    fn problem(&self) -> &dyn Problem {
        self.problem.as_ref()
    }

    fn population(&self) -> &Population {
        &self.population
    }

    fn offspring(&self) -> Option<&Population> {
        self.offspring.as_ref()
    }

    fn n_gen(&self) -> usize {
        self.n_gen
    }
}

impl<'a> Optimizer for GeneticAlgorithm<'a> {
    fn initialize(&mut self) -> Result<(), OptimizerError> {
        let (lower, upper) = self.problem.bounds();

        let mut individuals: Vec<Individual> = (0..self.parameters.population_size)
            .map(|_| {
                let x = DVector::from_fn(lower.len(), |i, _| {
                    if upper[i] > lower[i] { self.rng.gen_range(lower[i]..upper[i]) } else { lower[i] }
                });
                Individual::unevaluated(x)
            })
            .collect();

        self.evaluate_individuals(&mut individuals)?;

        self.population = Population::new(individuals);
        self.offspring = None;
        self.best_solution = None;
        self.n_gen = 1;
        self.update_best();

        self.yapper.startup_yap();
        debug!(population_size = self.population.len(), "initialized population");

        Ok(())
    }

    fn step(&mut self) -> Result<(), OptimizerError> {
        if self.n_gen == 0 {
            return Err(OptimizerError::NotInitialized);
        }

        let mut offspring = self.make_offspring()?;
        self.evaluate_individuals(&mut offspring)?;
        let offspring = Population::new(offspring);

        // Parents that survive keep their identity
        let merged = self.population.merge(&offspring);
        self.population = select_top_n(&merged, self.parameters.population_size);
        self.offspring = Some(offspring);
        self.n_gen += 1;

        self.update_best();

        if let Some(best) = &self.best_solution {
            self.yapper.generation_yap(self.n_gen, best);
            debug!(n_gen = self.n_gen, best_f = ?best.f().get(0), "finished generation");
        }

        Ok(())
    }

    fn get_best_solution(&self) -> Option<&Individual> {
        self.best_solution.as_ref()
    }
}

use std::collections::HashSet;
use std::fmt;

use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::optimization::algorithm::{AlgorithmState, Callback};
use crate::optimization::individual::IndividualId;
use crate::optimization::population::{Population, PopulationError};
use crate::optimization::problem::{linspace, Problem, ProblemError};

use super::canvas::{Canvas, CanvasError};
use super::frame::{extent, Marker, SeriesColor};

#[derive(Debug, Clone, PartialEq)]
pub struct PlotterSettings {
    pub show_after_draw: bool,       // Show the frame right after drawing it
    pub raise_if_unsupported: bool,  // Error out on problems that are not 1 variable / 1 objective, instead of skipping
    pub surface_sample_count: usize, // Number of samples for the true objective curve
}

impl PlotterSettings {
    pub fn new(show_after_draw: bool, raise_if_unsupported: bool, surface_sample_count: usize) -> Self {
        Self { show_after_draw, raise_if_unsupported, surface_sample_count }
    }
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self::new(true, true, 10_000)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PlotterState {
    AwaitingFirstGeneration,
    HasPriorGeneration { last_population: HashSet<IndividualId> },
}

/// Draws the objective curve of a one-variable, one-objective problem together with the
/// current population, marking individuals that were not part of the previous generation.
pub struct GenerationPlotter<C: Canvas> {
    settings: PlotterSettings,
    canvas: C,
    state: PlotterState,
}

// Everything a frame needs, computed before anything is drawn
struct GenerationFrame {
    surface: Vec<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    population: Vec<(f64, f64)>,
    new_individuals: Vec<(f64, f64)>,
    offspring: Option<Vec<(f64, f64)>>,
}

impl<C: Canvas> GenerationPlotter<C> {
    pub fn new(settings: PlotterSettings, canvas: C) -> Result<Self, GenerationPlotError> {
        if settings.surface_sample_count < 2 {
            return Err(GenerationPlotError::InvalidSurfaceSampleCount { count: settings.surface_sample_count });
        }

        Ok(Self { settings, canvas, state: PlotterState::AwaitingFirstGeneration })
    }

    pub fn settings(&self) -> &PlotterSettings {
        &self.settings
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Ids of the population seen on the last drawn generation, None before the first one.
    pub fn last_population(&self) -> Option<&HashSet<IndividualId>> {
        match &self.state {
            PlotterState::AwaitingFirstGeneration => None,
            PlotterState::HasPriorGeneration { last_population } => Some(last_population),
        }
    }

    pub fn is_applicable(problem: &dyn Problem) -> bool {
        problem.n_var() == 1 && problem.n_obj() == 1
    }

    /// Flags the individuals that were not in the previous generation. Everything is new on the first call.
    pub fn new_individuals_mask(&self, population: &Population) -> Vec<bool> {
        match &self.state {
            PlotterState::AwaitingFirstGeneration => vec![true; population.len()],
            PlotterState::HasPriorGeneration { last_population } => {
                population.iter().map(|ind| !last_population.contains(&ind.id())).collect()
            }
        }
    }

    pub fn on_generation(&mut self, algorithm: &dyn AlgorithmState) -> Result<(), GenerationPlotError> {
        let problem = algorithm.problem();

        if !Self::is_applicable(problem) {
            if self.settings.raise_if_unsupported {
                return Err(GenerationPlotError::UnsupportedProblemShape { n_var: problem.n_var(), n_obj: problem.n_obj() });
            }

            debug!(n_var = problem.n_var(), n_obj = problem.n_obj(), "skipping frame for unsupported problem shape");
            return Ok(());
        }

        let population = algorithm.population();
        let generation_frame = self.prepare_frame(problem, population, algorithm.offspring())?;

        debug!(
            n_gen = algorithm.n_gen(),
            population = generation_frame.population.len(),
            new = generation_frame.new_individuals.len(),
            "drawing generation"
        );

        let frame = self.canvas.frame_mut();

        frame.plot_line(generation_frame.surface, SeriesColor::BLACK.with_alpha(0.6), Some("True"));

        match generation_frame.y_range {
            Some((min, max)) => frame.set_y_range(min, max),
            None => warn!("objective surface has no finite values, leaving the y range unset"),
        }

        frame.scatter(generation_frame.population, Marker::Circle, 5, SeriesColor::BLUE, Some("Population"));

        if !generation_frame.new_individuals.is_empty() {
            frame.scatter(generation_frame.new_individuals, Marker::Star, 6, SeriesColor::RED, Some("New"));
        }

        if let Some(offspring) = generation_frame.offspring {
            frame.scatter(offspring, Marker::Star, 4, SeriesColor::PURPLE, Some("Offspring"));
        }

        frame.set_title(format!("Generation: {}", algorithm.n_gen()));
        frame.enable_legend();

        if self.settings.show_after_draw {
            self.canvas.show().map_err(|err| GenerationPlotError::CanvasError { err })?;
        }

        self.state = PlotterState::HasPriorGeneration { last_population: population.ids() };

        Ok(())
    }

    fn prepare_frame(
        &self,
        problem: &dyn Problem,
        population: &Population,
        offspring: Option<&Population>,
    ) -> Result<GenerationFrame, GenerationPlotError> {
        let (lower, upper) = problem.bounds();
        let (lo, hi) = match (lower.get(0), upper.get(0)) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => return Err(GenerationPlotError::MalformedBounds),
        };

        let samples = linspace(lo, hi, self.settings.surface_sample_count);
        let sample_matrix = DMatrix::from_column_slice(samples.len(), 1, &samples);

        let objectives = problem
            .evaluate(&sample_matrix)
            .map_err(|err| GenerationPlotError::ProblemError { err })?;

        if objectives.nrows() != samples.len() {
            return Err(GenerationPlotError::ProblemError {
                err: ProblemError::DimensionMismatch { expected: samples.len(), found: objectives.nrows() },
            });
        }

        if objectives.ncols() < 1 {
            return Err(GenerationPlotError::ProblemError {
                err: ProblemError::EvaluationFailed { reason: "evaluation returned no objective values".to_string() },
            });
        }

        let surface_values: Vec<f64> = objectives.column(0).iter().copied().collect();
        let y_range = extent(surface_values.iter().copied());
        let surface = samples.into_iter().zip(surface_values).collect();

        let is_new = self.new_individuals_mask(population);
        let new_population = population
            .select(&is_new)
            .map_err(|err| GenerationPlotError::PopulationError { err })?;

        let offspring = match offspring {
            Some(offspring) if !offspring.is_empty() => Some(first_components(offspring)?),
            _ => None,
        };

        Ok(GenerationFrame {
            surface,
            y_range,
            population: first_components(population)?,
            new_individuals: first_components(&new_population)?,
            offspring,
        })
    }
}

// (X[0], F[0]) of every individual
fn first_components(population: &Population) -> Result<Vec<(f64, f64)>, GenerationPlotError> {
    let (x, f, _cv) = population
        .get_x_f_cv()
        .map_err(|err| GenerationPlotError::PopulationError { err })?;

    if population.is_empty() {
        return Ok(Vec::new());
    }

    if x.ncols() == 0 || f.ncols() == 0 {
        return Err(GenerationPlotError::UnevaluatedIndividuals);
    }

    Ok(x.column(0).iter().copied().zip(f.column(0).iter().copied()).collect())
}

impl<C: Canvas> Callback for GenerationPlotter<C> {
    type Error = GenerationPlotError;

    fn notify(&mut self, algorithm: &dyn AlgorithmState) -> Result<(), Self::Error> {
        self.on_generation(algorithm)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationPlotError {
    UnsupportedProblemShape { n_var: usize, n_obj: usize },
    InvalidSurfaceSampleCount { count: usize },
    MalformedBounds,
    UnevaluatedIndividuals,
    ProblemError { err: ProblemError },
    PopulationError { err: PopulationError },
    CanvasError { err: CanvasError },
}

impl fmt::Display for GenerationPlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationPlotError::UnsupportedProblemShape { n_var, n_obj } => write!(
                f,
                "this visualization only supports problems with one variable and one objective (got {} variables, {} objectives)",
                n_var, n_obj
            ),
            GenerationPlotError::InvalidSurfaceSampleCount { count } => {
                write!(f, "surface needs at least 2 samples, got {}", count)
            }
            GenerationPlotError::MalformedBounds => write!(f, "problem bounds are empty"),
            GenerationPlotError::UnevaluatedIndividuals => write!(f, "population contains unevaluated individuals"),
            GenerationPlotError::ProblemError { err } => write!(f, "{}", err),
            GenerationPlotError::PopulationError { err } => write!(f, "{}", err),
            GenerationPlotError::CanvasError { err } => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GenerationPlotError {}

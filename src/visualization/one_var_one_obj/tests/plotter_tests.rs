use nalgebra::{DMatrix, DVector};

use super::super::*;
use crate::optimization::algorithm::GenerationSnapshot;
use crate::optimization::individual::Individual;
use crate::optimization::problem::FunctionProblem;
use crate::visualization::canvas::MemoryCanvas;
use crate::visualization::frame::SeriesKind;

fn individual(x: f64, f: f64) -> Individual {
    Individual::new(DVector::from_vec(vec![x]), DVector::from_vec(vec![f]), 0.0)
}

fn line_problem() -> FunctionProblem<'static> {
    FunctionProblem::new_scalar(0.0, 2.0, |x| 3.0 * x + 1.0).unwrap()
}

fn two_variable_problem() -> FunctionProblem<'static> {
    FunctionProblem::new(vec![0.0, 0.0], vec![1.0, 1.0], 1, |x: &[f64]| vec![x[0] + x[1]]).unwrap()
}

fn two_objective_problem() -> FunctionProblem<'static> {
    FunctionProblem::new(vec![0.0], vec![1.0], 2, |x: &[f64]| vec![x[0], 1.0 - x[0]]).unwrap()
}

struct FailingProblem;

impl Problem for FailingProblem {
    fn n_var(&self) -> usize { 1 }

    fn n_obj(&self) -> usize { 1 }

    fn bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (DVector::from_vec(vec![0.0]), DVector::from_vec(vec![1.0]))
    }

    fn evaluate(&self, _samples: &DMatrix<f64>) -> Result<DMatrix<f64>, ProblemError> {
        Err(ProblemError::EvaluationFailed { reason: "solver diverged".to_string() })
    }
}

fn plotter(settings: PlotterSettings) -> GenerationPlotter<MemoryCanvas> {
    GenerationPlotter::new(settings, MemoryCanvas::new()).unwrap()
}

#[test]
fn test_default_settings() {
    let settings = PlotterSettings::default();

    assert!(settings.show_after_draw);
    assert!(settings.raise_if_unsupported);
    assert_eq!(settings.surface_sample_count, 10_000);
}

#[test]
fn test_invalid_sample_count_is_rejected() {
    for count in [0, 1] {
        let result = GenerationPlotter::new(PlotterSettings::new(true, true, count), MemoryCanvas::new());
        assert!(
            matches!(result, Err(GenerationPlotError::InvalidSurfaceSampleCount { count: c }) if c == count),
            "A surface with {} samples should be rejected", count
        );
    }
}

#[test]
fn test_supported_problem_never_raises() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.5, 2.5)]);

    for raise in [true, false] {
        let mut plotter = plotter(PlotterSettings::new(true, raise, 100));
        let state = GenerationSnapshot::new(&problem, &population, 1);

        assert!(plotter.on_generation(&state).is_ok(), "1 variable / 1 objective should always be drawn");
        assert_eq!(plotter.canvas().shown_frames().len(), 1);
    }
}

#[test]
fn test_two_variables_raise_when_configured() {
    let problem = two_variable_problem();
    let population = Population::new(vec![Individual::new(
        DVector::from_vec(vec![0.1, 0.2]),
        DVector::from_vec(vec![0.3]),
        0.0,
    )]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 100));

    let result = plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1));

    assert_eq!(result, Err(GenerationPlotError::UnsupportedProblemShape { n_var: 2, n_obj: 1 }));
    assert!(plotter.canvas().frame().is_empty(), "Nothing should be drawn on an unsupported problem");
    assert!(plotter.canvas().shown_frames().is_empty());
    assert!(plotter.last_population().is_none());
}

#[test]
fn test_two_objectives_are_unsupported() {
    let problem = two_objective_problem();
    let population = Population::default();
    let mut plotter = plotter(PlotterSettings::new(true, true, 100));

    let result = plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1));

    assert_eq!(result, Err(GenerationPlotError::UnsupportedProblemShape { n_var: 1, n_obj: 2 }));
}

#[test]
fn test_unsupported_problem_is_skipped_silently() {
    let supported = line_problem();
    let unsupported = two_variable_problem();
    let first = Population::new(vec![individual(0.5, 2.5)]);
    let second = Population::new(vec![individual(0.7, 3.1)]);

    let mut plotter = plotter(PlotterSettings::new(true, false, 100));
    plotter.on_generation(&GenerationSnapshot::new(&supported, &first, 1)).unwrap();

    let before = plotter.last_population().cloned();
    let result = plotter.on_generation(&GenerationSnapshot::new(&unsupported, &second, 2));

    assert!(result.is_ok());
    assert_eq!(plotter.canvas().shown_frames().len(), 1, "A skipped generation should not draw anything");
    assert!(plotter.canvas().frame().is_empty());
    assert_eq!(plotter.last_population().cloned(), before, "A skipped generation should not touch the state");
}

#[test]
fn test_surface_is_sampled_evenly_over_bounds() {
    let problem = line_problem();
    let population = Population::default();
    let mut plotter = plotter(PlotterSettings::new(true, true, 201));

    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1)).unwrap();

    let frame = plotter.canvas().last_shown().unwrap();
    let surface = frame.series_labelled("True").expect("The true surface should be drawn");

    assert_eq!(surface.kind, SeriesKind::Line);
    assert_eq!(surface.points.len(), 201);
    assert_eq!(surface.points[0].0, 0.0, "The surface should start at the lower bound");
    assert_eq!(surface.points[200].0, 2.0, "The surface should end at the upper bound");

    for pair in surface.points.windows(2) {
        assert!(((pair[1].0 - pair[0].0) - 0.01).abs() < 1e-9, "Surface samples should be evenly spaced");
    }
    for (x, f) in &surface.points {
        assert!((f - (3.0 * x + 1.0)).abs() < 1e-9, "Surface values should come from the problem");
    }
}

#[test]
fn test_y_range_follows_surface_values() {
    let problem = line_problem();
    let population = Population::new(vec![individual(1.0, 100.0)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1)).unwrap();

    let frame = plotter.canvas().last_shown().unwrap();
    assert_eq!(frame.y_range, Some((1.0, 7.0)), "The y range should span the evaluated surface only");
}

#[test]
fn test_title_legend_and_population_markers() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.1, 1.3), individual(0.5, 2.5), individual(0.9, 3.7)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 7)).unwrap();

    let frame = plotter.canvas().last_shown().unwrap();
    assert_eq!(frame.title.as_deref(), Some("Generation: 7"));
    assert!(frame.legend);

    let drawn = frame.series_labelled("Population").unwrap();
    assert_eq!(drawn.kind, SeriesKind::Scatter { marker: Marker::Circle, size: 5 });
    assert_eq!(drawn.points, vec![(0.1, 1.3), (0.5, 2.5), (0.9, 3.7)]);
}

#[test]
fn test_offspring_are_drawn_when_present() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.1, 1.3)]);
    let offspring = Population::new(vec![individual(0.4, 2.2), individual(1.2, 4.6)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    let state = GenerationSnapshot::new(&problem, &population, 2).with_offspring(&offspring);
    plotter.on_generation(&state).unwrap();

    let frame = plotter.canvas().last_shown().unwrap();
    let drawn = frame.series_labelled("Offspring").expect("Offspring should be drawn");
    assert_eq!(drawn.points, vec![(0.4, 2.2), (1.2, 4.6)]);
    assert_eq!(drawn.kind, SeriesKind::Scatter { marker: Marker::Star, size: 4 });
}

#[test]
fn test_absent_or_empty_offspring_are_not_drawn() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.1, 1.3)]);
    let empty = Population::default();
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1)).unwrap();
    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 2).with_offspring(&empty)).unwrap();

    for frame in plotter.canvas().shown_frames() {
        assert!(frame.series_labelled("Offspring").is_none());
    }
}

#[test]
fn test_without_show_frames_accumulate() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.1, 1.3)]);
    let mut plotter = plotter(PlotterSettings::new(false, true, 50));

    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1)).unwrap();
    plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 2)).unwrap();

    assert!(plotter.canvas().shown_frames().is_empty(), "Nothing should be shown");

    let pending = plotter.canvas().frame();
    assert_eq!(pending.title.as_deref(), Some("Generation: 2"));
    // True + Population + New on the first call, True + Population on the second
    assert_eq!(pending.series.len(), 5);
    assert!(plotter.last_population().is_some(), "The state should advance even without showing");
}

#[test]
fn test_evaluation_failure_propagates_without_drawing() {
    let problem = FailingProblem;
    let population = Population::new(vec![individual(0.5, 0.5)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    let result = plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1));

    assert_eq!(
        result,
        Err(GenerationPlotError::ProblemError {
            err: ProblemError::EvaluationFailed { reason: "solver diverged".to_string() }
        })
    );
    assert!(plotter.canvas().frame().is_empty(), "A failed call should leave the frame untouched");
    assert!(plotter.last_population().is_none());
}

#[test]
fn test_unevaluated_population_is_rejected() {
    let problem = line_problem();
    let population = Population::new(vec![Individual::unevaluated(DVector::from_vec(vec![0.5]))]);
    let mut plotter = plotter(PlotterSettings::default());

    let result = plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1));

    assert_eq!(result, Err(GenerationPlotError::UnevaluatedIndividuals));
    assert!(plotter.canvas().frame().is_empty());
}

#[test]
fn test_plotter_as_callback() {
    let problem = line_problem();
    let population = Population::new(vec![individual(0.1, 1.3)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    let callback: &mut dyn Callback<Error = GenerationPlotError> = &mut plotter;
    callback.notify(&GenerationSnapshot::new(&problem, &population, 3)).unwrap();

    let canvas = plotter.into_canvas();
    assert_eq!(canvas.last_shown().unwrap().title.as_deref(), Some("Generation: 3"));
}

struct ObjectivelessProblem;

impl Problem for ObjectivelessProblem {
    fn n_var(&self) -> usize { 1 }

    fn n_obj(&self) -> usize { 1 }

    fn bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (DVector::from_vec(vec![0.0]), DVector::from_vec(vec![1.0]))
    }

    fn evaluate(&self, samples: &DMatrix<f64>) -> Result<DMatrix<f64>, ProblemError> {
        Ok(DMatrix::zeros(samples.nrows(), 0))
    }
}

#[test]
fn test_evaluation_without_objectives_is_reported() {
    let problem = ObjectivelessProblem;
    let population = Population::new(vec![individual(0.5, 0.5)]);
    let mut plotter = plotter(PlotterSettings::new(true, true, 50));

    let result = plotter.on_generation(&GenerationSnapshot::new(&problem, &population, 1));

    assert!(
        matches!(result, Err(GenerationPlotError::ProblemError { err: ProblemError::EvaluationFailed { .. } })),
        "A surface without objective values should be an evaluation failure, got {:?}", result
    );
    assert!(plotter.canvas().frame().is_empty());
    assert!(plotter.last_population().is_none());
}

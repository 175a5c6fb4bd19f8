use std::error::Error;
use std::f64::consts::PI;

use evoplot::optimization::genetic_algorithm::{GeneticAlgorithm, GeneticAlgorithmParameters};
use evoplot::optimization::optimizer::Optimizer;
use evoplot::optimization::problem::FunctionProblem;
use evoplot::optimization::verbosity::YapLevel;
use evoplot::visualization::one_var_one_obj::{GenerationPlotter, PlotterSettings};
use evoplot::visualization::plotters_canvas::PlottersCanvas;
use tracing::info;

const MAX_GENERATIONS: usize = 30;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    // Multimodal test function on [-1, 2]
    let problem = FunctionProblem::new_scalar(-1.0, 2.0, |x| x * (10.0 * PI * x).sin() + 1.0)?;

    let parameters = GeneticAlgorithmParameters::new(20, 10, 0.05, 0.9);
    let mut ga = GeneticAlgorithm::new(problem, parameters)?;
    ga.set_verbosity(YapLevel::ALittle, Some(MAX_GENERATIONS));

    let canvas = PlottersCanvas::new("generation_frames");
    let mut plotter = GenerationPlotter::new(PlotterSettings::default(), canvas)?;

    ga.run_with_callback(MAX_GENERATIONS, &mut plotter)?;

    if let Some(best) = ga.get_best_solution() {
        info!(x = best.x()[0], f = best.f()[0], "best solution");
        println!("Best solution: x = {:.6}, f(x) = {:.6}", best.x()[0], best.f()[0]);
    }

    let canvas = plotter.into_canvas();
    println!("Wrote {} frames to {}", canvas.frames_written(), canvas.output_dir().display());

    Ok(())
}

use std::cmp::Ordering;

use super::individual::Individual;
use super::population::Population;

// Aux tool for survival. Returns the best n individuals: feasible first, then by lowest first objective
pub fn select_top_n(population: &Population, n: usize) -> Population {
    let mut ranked: Vec<&Individual> = population.iter().collect();

    ranked.sort_by(|a, b| compare_individuals(a, b));

    ranked.into_iter().take(n).cloned().collect::<Vec<Individual>>().into()
}

// Lower constraint violation wins, ties broken by the first objective. NaN objectives sort last
pub fn compare_individuals(a: &Individual, b: &Individual) -> Ordering {
    let a_cv = a.cv().max(0.0);
    let b_cv = b.cv().max(0.0);

    match a_cv.partial_cmp(&b_cv) {
        Some(Ordering::Equal) | None => {}
        Some(ordering) => return ordering,
    }

    let a_f = a.f().get(0).copied().unwrap_or(f64::NAN);
    let b_f = b.f().get(0).copied().unwrap_or(f64::NAN);

    match (a_f.is_nan(), b_f.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal),
    }
}

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::DVector;

static NEXT_INDIVIDUAL_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of an individual, handed out once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(u64);

impl IndividualId {
    fn next() -> Self {
        IndividualId(NEXT_INDIVIDUAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A candidate solution. Equality and hashing follow the id, never the values:
/// a clone is the same individual, a freshly created one never is.
#[derive(Debug, Clone)]
pub struct Individual {
    id: IndividualId,
    x: DVector<f64>,  // Decision vector
    f: DVector<f64>,  // Objective vector, empty until evaluated
    cv: f64,          // Constraint violation
}

impl Individual {
    pub fn new(x: DVector<f64>, f: DVector<f64>, cv: f64) -> Self {
        Self { id: IndividualId::next(), x, f, cv }
    }

    pub fn unevaluated(x: DVector<f64>) -> Self {
        Self::new(x, DVector::zeros(0), 0.0)
    }

    pub fn set_evaluation(&mut self, f: DVector<f64>, cv: f64) {
        self.f = f;
        self.cv = cv;
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn x(&self) -> &DVector<f64> {
        &self.x
    }

    pub fn f(&self) -> &DVector<f64> {
        &self.f
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }

    pub fn is_evaluated(&self) -> bool {
        self.f.len() > 0
    }

    pub fn is_feasible(&self) -> bool {
        self.cv <= 0.0
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Individual {}

impl Hash for Individual {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

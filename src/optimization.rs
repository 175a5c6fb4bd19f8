pub mod problem;
pub mod individual;
pub mod population;
pub mod algorithm;
pub mod optimizer;
pub mod tools;
pub mod repair;
pub mod genetic_algorithm;
pub mod verbosity;

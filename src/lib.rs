pub mod optimization;
pub mod visualization;

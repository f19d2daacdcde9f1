//! CLI command implementations

pub mod drivers;
pub mod matrix;
pub mod report;
pub mod stress;
pub mod track;
pub mod workshop;

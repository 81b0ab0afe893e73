//! Dashboard panels.

pub mod chart;
pub mod summary;

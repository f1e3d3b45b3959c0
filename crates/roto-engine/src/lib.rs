// Library root: ESPN fantasy-baseball stat normalization, team aggregation,
// and rotisserie standings.

pub mod catalog;
pub mod config;
pub mod league;
mod lenient;
pub mod positions;
pub mod stats;
pub mod valuation;

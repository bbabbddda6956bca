//! Cost-sensitive decision threshold selection.

pub mod cost;
pub mod grid;
pub mod optimizer;

pub use cost::{Confusion, CostModel};
pub use grid::{DEFAULT_GRID_SIZE, SearchStrategy, breakpoints, linear_grid};
pub use optimizer::{CurvePoint, ThresholdOptimizer, ThresholdResult, optimize};

//! Candidate thresholds.

use serde::{Deserialize, Serialize};

pub const GRID_START: f64 = 0.01;
pub const GRID_END: f64 = 0.99;
pub const DEFAULT_GRID_SIZE: usize = 200;

/// How candidate thresholds are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// `grid_size` evenly spaced points over `[GRID_START, GRID_END]`.
    #[default]
    Grid,
    /// Every distinct probability inside `[GRID_START, GRID_END]` plus both
    /// bounds. Confusion counts only change at these points, so this finds the
    /// exact minimum cost over the interval.
    Breakpoints,
}

/// Evenly spaced thresholds with both ends included.
///
/// A single-point grid is `[GRID_START]`; an empty one has no points.
pub fn linear_grid(grid_size: usize) -> Vec<f64> {
    match grid_size {
        0 => Vec::new(),
        1 => vec![GRID_START],
        n => {
            let step = (GRID_END - GRID_START) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        GRID_END
                    } else {
                        GRID_START + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Sorted, de-duplicated breakpoint candidates.
pub fn breakpoints(probabilities: &[f64]) -> Vec<f64> {
    let mut points: Vec<f64> = probabilities
        .iter()
        .copied()
        .filter(|p| (GRID_START..=GRID_END).contains(p))
        .chain([GRID_START, GRID_END])
        .collect();
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

//! Cost-minimizing threshold search.

use crate::config::ThresholdConfig;
use crate::error::ThresholdError;
use crate::threshold::cost::{Confusion, CostModel};
use crate::threshold::grid::{DEFAULT_GRID_SIZE, SearchStrategy, breakpoints, linear_grid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One evaluated candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub threshold: f64,
    pub cost: f64,
}

/// The chosen operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub threshold: f64,
    pub expected_cost: f64,
    pub confusion: Confusion,
    /// Every candidate in ascending threshold order, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<CurvePoint>>,
}

impl ThresholdResult {
    /// Hard 0/1 decisions at the chosen threshold.
    pub fn decide(&self, probabilities: &[f64]) -> Vec<u8> {
        probabilities
            .iter()
            .map(|&p| u8::from(p >= self.threshold))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    threshold: f64,
    cost: f64,
    confusion: Confusion,
}

impl Evaluation {
    fn at(threshold: f64, labels: &[u8], probabilities: &[f64], cost_model: &CostModel) -> Self {
        let confusion = Confusion::at_threshold(labels, probabilities, threshold);
        Self {
            threshold,
            cost: cost_model.cost(&confusion),
            confusion,
        }
    }

    /// Order by `(cost, threshold)`: cheaper wins, exact ties go to the
    /// smaller threshold. Associative and commutative, so any reduction tree
    /// gives the same answer.
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.threshold.total_cmp(&other.threshold))
    }

    fn min(a: Self, b: Self) -> Self {
        if b.key_cmp(&a) == Ordering::Less { b } else { a }
    }
}

/// Searches candidate thresholds for the minimum expected cost.
#[derive(Debug, Clone)]
pub struct ThresholdOptimizer {
    cost_model: CostModel,
    grid_size: usize,
    strategy: SearchStrategy,
    record_curve: bool,
    require_both_classes: bool,
}

impl Default for ThresholdOptimizer {
    fn default() -> Self {
        Self::new(CostModel::default())
    }
}

impl ThresholdOptimizer {
    pub fn new(cost_model: CostModel) -> Self {
        Self {
            cost_model,
            grid_size: DEFAULT_GRID_SIZE,
            strategy: SearchStrategy::Grid,
            record_curve: false,
            require_both_classes: false,
        }
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::new(config.cost_model())
            .with_grid_size(config.grid_size)
            .with_strategy(config.strategy)
            .record_curve(config.record_curve)
            .require_both_classes(config.require_both_classes)
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Keep every evaluated `(threshold, cost)` pair in the result.
    pub fn record_curve(mut self, record: bool) -> Self {
        self.record_curve = record;
        self
    }

    /// Fail with [`ThresholdError::SingleClass`] instead of warning.
    pub fn require_both_classes(mut self, require: bool) -> Self {
        self.require_both_classes = require;
        self
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Pick the cost-minimizing threshold for `labels` scored as `probabilities`.
    ///
    /// Either returns a complete result or the first violated precondition.
    pub fn optimize(
        &self,
        labels: &[u8],
        probabilities: &[f64],
    ) -> Result<ThresholdResult, ThresholdError> {
        self.check_inputs(labels, probabilities)?;

        let candidates = match self.strategy {
            SearchStrategy::Grid => linear_grid(self.grid_size),
            SearchStrategy::Breakpoints => breakpoints(probabilities),
        };

        let evaluations: Vec<Evaluation> = candidates
            .par_iter()
            .map(|&t| Evaluation::at(t, labels, probabilities, &self.cost_model))
            .collect();

        let best = evaluations
            .par_iter()
            .copied()
            .reduce_with(Evaluation::min)
            .ok_or(ThresholdError::InvalidGrid {
                grid_size: self.grid_size,
            })?;

        tracing::debug!(
            strategy = ?self.strategy,
            candidates = evaluations.len(),
            samples = labels.len(),
            "Threshold search complete"
        );
        tracing::info!(
            threshold = best.threshold,
            expected_cost = best.cost,
            "Selected decision threshold"
        );

        let curve = self.record_curve.then(|| {
            evaluations
                .iter()
                .map(|e| CurvePoint {
                    threshold: e.threshold,
                    cost: e.cost,
                })
                .collect()
        });

        Ok(ThresholdResult {
            threshold: best.threshold,
            expected_cost: best.cost,
            confusion: best.confusion,
            curve,
        })
    }

    fn check_inputs(&self, labels: &[u8], probabilities: &[f64]) -> Result<(), ThresholdError> {
        if labels.is_empty() || probabilities.is_empty() {
            return Err(ThresholdError::EmptyInput);
        }
        if labels.len() != probabilities.len() {
            return Err(ThresholdError::InputMismatch {
                labels: labels.len(),
                probabilities: probabilities.len(),
            });
        }
        if self.grid_size < 1 {
            return Err(ThresholdError::InvalidGrid {
                grid_size: self.grid_size,
            });
        }
        if let Some(index) = labels.iter().position(|&l| l > 1) {
            return Err(ThresholdError::InvalidRange {
                index,
                message: format!("label {} is not 0 or 1", labels[index]),
            });
        }
        if let Some(index) = probabilities
            .iter()
            .position(|p| !(0.0..=1.0).contains(p))
        {
            return Err(ThresholdError::InvalidRange {
                index,
                message: format!("probability {} is outside [0, 1]", probabilities[index]),
            });
        }
        self.cost_model.validate()?;

        let positives = labels.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == labels.len() {
            let class = u8::from(positives > 0);
            if self.require_both_classes {
                return Err(ThresholdError::SingleClass { class });
            }
            tracing::warn!(
                class,
                samples = labels.len(),
                "All labels belong to one class; the selected threshold is uninformative"
            );
        }
        Ok(())
    }
}

/// Grid search with an explicit cost model and grid size.
pub fn optimize(
    labels: &[u8],
    probabilities: &[f64],
    cost_model: CostModel,
    grid_size: usize,
) -> Result<ThresholdResult, ThresholdError> {
    ThresholdOptimizer::new(cost_model)
        .with_grid_size(grid_size)
        .optimize(labels, probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::grid::GRID_START;

    #[test]
    fn test_separable_example_picks_smallest_zero_cost() {
        let labels = [0, 0, 1, 1];
        let probs = [0.1, 0.4, 0.6, 0.9];
        let cost = CostModel::new(5.0, 1.0).unwrap();
        let result = optimize(&labels, &probs, cost, 99).unwrap();

        assert_eq!(result.expected_cost, 0.0);
        assert_eq!(result.confusion, Confusion { tn: 2, fp: 0, fn_: 0, tp: 2 });
        assert!(result.threshold > 0.4 && result.threshold <= 0.6);

        let smaller_zero_cost = linear_grid(99)
            .into_iter()
            .filter(|&t| t < result.threshold)
            .any(|t| cost.cost(&Confusion::at_threshold(&labels, &probs, t)) == 0.0);
        assert!(!smaller_zero_cost);
    }

    #[test]
    fn test_tie_prefers_smaller_threshold() {
        // Cost 1 below 0.3 and above 0.7, cost 2 in between.
        let labels = [1, 0];
        let probs = [0.3, 0.7];
        let result = optimize(&labels, &probs, CostModel::new(1.0, 1.0).unwrap(), 200).unwrap();
        assert_eq!(result.threshold, GRID_START);
        assert_eq!(result.expected_cost, 1.0);
    }

    #[test]
    fn test_min_is_order_independent() {
        let a = Evaluation {
            threshold: 0.2,
            cost: 3.0,
            confusion: Confusion::default(),
        };
        let b = Evaluation { threshold: 0.8, ..a };
        let c = Evaluation {
            threshold: 0.5,
            cost: 4.0,
            ..a
        };
        let forward = [a, b, c].into_iter().reduce(Evaluation::min).unwrap();
        let backward = [c, b, a].into_iter().reduce(Evaluation::min).unwrap();
        assert_eq!(forward.threshold, 0.2);
        assert_eq!(backward.threshold, 0.2);
    }

    #[test]
    fn test_precondition_errors() {
        let cost = CostModel::default();
        assert_eq!(
            optimize(&[], &[], cost, 10).unwrap_err(),
            ThresholdError::EmptyInput
        );
        assert_eq!(
            optimize(&[0, 1], &[0.5], cost, 10).unwrap_err(),
            ThresholdError::InputMismatch {
                labels: 2,
                probabilities: 1
            }
        );
        assert_eq!(
            optimize(&[0, 1], &[0.2, 0.5], cost, 0).unwrap_err(),
            ThresholdError::InvalidGrid { grid_size: 0 }
        );
        assert!(matches!(
            optimize(&[0, 2], &[0.2, 0.5], cost, 10),
            Err(ThresholdError::InvalidRange { index: 1, .. })
        ));
        assert!(matches!(
            optimize(&[0, 1], &[0.2, 1.5], cost, 10),
            Err(ThresholdError::InvalidRange { index: 1, .. })
        ));
        assert!(matches!(
            optimize(&[0, 1], &[f64::NAN, 0.5], cost, 10),
            Err(ThresholdError::InvalidRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_cost_model_rejected() {
        let cost = CostModel {
            false_negative_cost: -5.0,
            false_positive_cost: 1.0,
        };
        assert!(matches!(
            optimize(&[0, 1], &[0.2, 0.5], cost, 10),
            Err(ThresholdError::InvalidCost { .. })
        ));
    }

    #[test]
    fn test_single_class_warns_or_fails() {
        let labels = [0, 0, 0];
        let probs = [0.2, 0.5, 0.9];
        let lenient = ThresholdOptimizer::default().optimize(&labels, &probs).unwrap();
        assert_eq!(lenient.expected_cost, 0.0);
        assert_eq!(lenient.confusion.tn, 3);

        let strict = ThresholdOptimizer::default().require_both_classes(true);
        assert_eq!(
            strict.optimize(&labels, &probs).unwrap_err(),
            ThresholdError::SingleClass { class: 0 }
        );
    }

    #[test]
    fn test_curve_recorded_in_grid_order() {
        let result = ThresholdOptimizer::default()
            .with_grid_size(5)
            .record_curve(true)
            .optimize(&[0, 1], &[0.3, 0.8])
            .unwrap();
        let curve = result.curve.unwrap();
        assert_eq!(curve.len(), 5);
        assert!(curve.windows(2).all(|w| w[0].threshold < w[1].threshold));
        assert!(curve.iter().any(|p| p.cost == result.expected_cost));
    }

    #[test]
    fn test_breakpoints_find_optimum_between_grid_points() {
        // The only zero-cost thresholds lie in (0.550, 0.551].
        let labels = [0, 1];
        let probs = [0.55, 0.551];
        let exact = ThresholdOptimizer::new(CostModel::new(1.0, 1.0).unwrap())
            .with_strategy(SearchStrategy::Breakpoints)
            .optimize(&labels, &probs)
            .unwrap();
        assert_eq!(exact.threshold, 0.551);
        assert_eq!(exact.expected_cost, 0.0);

        let grid = ThresholdOptimizer::new(CostModel::new(1.0, 1.0).unwrap())
            .with_grid_size(3)
            .optimize(&labels, &probs)
            .unwrap();
        assert_eq!(grid.expected_cost, 1.0);
    }

    #[test]
    fn test_decide() {
        let result = optimize(&[0, 1], &[0.2, 0.7], CostModel::default(), 200).unwrap();
        assert_eq!(result.decide(&[0.1, result.threshold, 0.95]), vec![0, 1, 1]);
    }

    #[test]
    fn test_result_json_shape() {
        let result = optimize(&[0, 1], &[0.2, 0.7], CostModel::default(), 2).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("curve").is_none());
        assert_eq!(json["confusion"]["fn"], 0);
        assert_eq!(json["threshold"], 0.01);
    }
}

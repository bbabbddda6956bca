//! Asymmetric misclassification costs and confusion counts.

use crate::error::ThresholdError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FALSE_NEGATIVE_COST: f64 = 5.0;
pub const DEFAULT_FALSE_POSITIVE_COST: f64 = 1.0;

/// Price of each error type, in caller-chosen units.
///
/// A false negative is a missed defaulter; a false positive is a good
/// applicant wrongly declined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub false_negative_cost: f64,
    pub false_positive_cost: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            false_negative_cost: DEFAULT_FALSE_NEGATIVE_COST,
            false_positive_cost: DEFAULT_FALSE_POSITIVE_COST,
        }
    }
}

impl CostModel {
    pub fn new(false_negative_cost: f64, false_positive_cost: f64) -> Result<Self, ThresholdError> {
        let model = Self {
            false_negative_cost,
            false_positive_cost,
        };
        model.validate()?;
        Ok(model)
    }

    /// Both costs must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [
            ("false_negative_cost", self.false_negative_cost),
            ("false_positive_cost", self.false_positive_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ThresholdError::InvalidCost {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Expected cost of a confusion matrix. Not normalized by sample size.
    pub fn cost(&self, confusion: &Confusion) -> f64 {
        self.false_negative_cost * confusion.fn_ as f64
            + self.false_positive_cost * confusion.fp as f64
    }
}

/// Binary confusion counts; positive means "predicted to default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confusion {
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tp: usize,
}

impl Confusion {
    /// Classify each row positive iff `probability >= threshold`.
    ///
    /// Inputs are assumed validated: equal lengths, labels in {0, 1}.
    pub fn at_threshold(labels: &[u8], probabilities: &[f64], threshold: f64) -> Self {
        let mut matrix = Self::default();
        for (&label, &p) in labels.iter().zip(probabilities) {
            match (p >= threshold, label == 1) {
                (true, true) => matrix.tp += 1,
                (true, false) => matrix.fp += 1,
                (false, true) => matrix.fn_ += 1,
                (false, false) => matrix.tn += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// TP / (TP + FP), 0.0 when nothing is predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// TP / (TP + FN), 0.0 when there are no positives.
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

//! Validation metrics and results reporting.

use crate::bigfive::{Trait, TraitMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification metrics of one trait head.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of positive samples
    pub support: usize,
    pub accuracy: f64,
}

impl TraitMetrics {
    /// Compute metrics for the positive class. A zero denominator yields 0.
    pub fn compute(truth: &[u8], predicted: &[u8]) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;
        for (&y, &p) in truth.iter().zip(predicted) {
            match (y, p) {
                (1, 1) => tp += 1,
                (0, 1) => fp += 1,
                (1, 0) => fn_ += 1,
                _ => {}
            }
            if y == p {
                correct += 1;
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        TraitMetrics {
            precision,
            recall,
            f1,
            support: tp + fn_,
            accuracy: ratio(correct, truth.len()),
        }
    }
}

/// Per-trait metrics over a validation partition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub per_trait: TraitMap<TraitMetrics>,
    /// Number of validation samples
    pub samples: usize,
}

impl EvaluationReport {
    /// Build a report from parallel truth/prediction label maps.
    pub fn from_predictions(truth: &[TraitMap<u8>], predicted: &[TraitMap<u8>]) -> Self {
        let per_trait = TraitMap::from_fn(|t| {
            let y: Vec<u8> = truth.iter().map(|labels| labels[t]).collect();
            let p: Vec<u8> = predicted.iter().map(|labels| labels[t]).collect();
            TraitMetrics::compute(&y, &p)
        });
        EvaluationReport {
            per_trait,
            samples: truth.len(),
        }
    }

    /// Unweighted mean F1 over the five traits.
    pub fn macro_f1(&self) -> f64 {
        self.per_trait.values().iter().map(|m| m.f1).sum::<f64>() / Trait::ALL.len() as f64
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation samples: {}", self.samples)?;
        writeln!(f, "+-------------------+-----------+--------+--------+---------+----------+")?;
        writeln!(f, "| Trait             | Precision | Recall |   F1   | Support | Accuracy |")?;
        writeln!(f, "+-------------------+-----------+--------+--------+---------+----------+")?;
        for (t, m) in self.per_trait.iter() {
            writeln!(
                f,
                "| {:<17} | {:>9.3} | {:>6.3} | {:>6.3} | {:>7} | {:>7.2}% |",
                t.name(),
                m.precision,
                m.recall,
                m.f1,
                m.support,
                m.accuracy * 100.0
            )?;
        }
        writeln!(f, "+-------------------+-----------+--------+--------+---------+----------+")?;
        write!(f, "Macro F1: {:.3}", self.macro_f1())
    }
}

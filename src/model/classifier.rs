//! Multi-output trait classifier: one binary logistic-regression head per trait.
//!
//! Heads are trained independently, with no modeling of correlations between
//! traits. Each head is an L2-regularized logistic regression fitted by
//! full-batch gradient descent starting from zero weights, so training is
//! deterministic for a given input.
//!
//! A trait whose label column holds a single value cannot be fitted; that
//! head becomes [`BinaryClassifier::Constant`] and always predicts the
//! observed label.

use crate::bigfive::{Trait, TraitMap};
use crate::error::{Error, Result};
use crate::model::tfidf::SparseVector;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Per-class sample weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassWeight {
    /// Every sample weighs 1
    None,
    /// Each class weighs `n / (2 * n_class)`
    #[default]
    Balanced,
}

/// Classifier hyperparameters (`[model]` in `config.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum number of full-batch passes
    pub epochs: usize,
    /// L2 penalty on the weights (not the bias)
    pub l2: f64,
    /// Stop once the largest gradient component falls below this
    pub tolerance: f64,
    pub class_weight: ClassWeight,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            learning_rate: 0.5,
            epochs: 400,
            l2: 1e-4,
            tolerance: 1e-6,
            class_weight: ClassWeight::Balanced,
        }
    }
}

/// One fitted trait head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryClassifier {
    Linear { weights: Array1<f64>, bias: f64 },
    /// Fallback for a label column with a single distinct value
    Constant { label: u8 },
}

/// Positive-class probability of one head.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Probability {
    Estimated(f64),
    /// The head never saw both classes; it always answers `label`
    Degenerate { label: u8 },
}

impl Probability {
    /// Probability as a number; a degenerate head is certain of its label.
    pub fn value(&self) -> f64 {
        match *self {
            Probability::Estimated(p) => p,
            Probability::Degenerate { label } => f64::from(label),
        }
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probability::Estimated(p) => write!(f, "{:.3}", p),
            Probability::Degenerate { label } => write!(f, "{} (constant)", label),
        }
    }
}

/// A trait whose training labels were all identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegenerateTrait {
    pub target: Trait,
    pub label: u8,
}

impl fmt::Display for DegenerateTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: every training label is {}, head predicts it unconditionally",
            self.target, self.label
        )
    }
}

impl BinaryClassifier {
    /// Fit one head on a label column.
    pub fn fit(
        features: &[SparseVector],
        labels: ArrayView1<u8>,
        n_features: usize,
        config: &ClassifierConfig,
    ) -> BinaryClassifier {
        let positives = labels.iter().filter(|&&y| y == 1).count();
        let n = labels.len();
        if positives == 0 || positives == n {
            let label = if positives == 0 { 0 } else { 1 };
            return BinaryClassifier::Constant { label };
        }

        let sample_weights: Vec<f64> = match config.class_weight {
            ClassWeight::None => vec![1.0; n],
            ClassWeight::Balanced => {
                let w_pos = n as f64 / (2.0 * positives as f64);
                let w_neg = n as f64 / (2.0 * (n - positives) as f64);
                labels
                    .iter()
                    .map(|&y| if y == 1 { w_pos } else { w_neg })
                    .collect()
            }
        };
        let total_weight: f64 = sample_weights.iter().sum();

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        let mut grad_w = Array1::<f64>::zeros(n_features);

        for epoch in 0..config.epochs {
            grad_w.fill(0.0);
            let mut grad_b = 0.0;

            for ((x, &y), &s) in features.iter().zip(labels.iter()).zip(&sample_weights) {
                let p = sigmoid(x.dot(&weights) + bias);
                let err = s * (p - f64::from(y));
                for &(i, v) in &x.entries {
                    grad_w[i] += err * v;
                }
                grad_b += err;
            }

            grad_w.mapv_inplace(|g| g / total_weight);
            grad_w.scaled_add(config.l2, &weights);
            grad_b /= total_weight;

            weights.scaled_add(-config.learning_rate, &grad_w);
            bias -= config.learning_rate * grad_b;

            let max_grad = grad_w.iter().fold(grad_b.abs(), |m, g| m.max(g.abs()));
            if max_grad < config.tolerance {
                debug!(epoch, max_grad, "gradient descent converged");
                break;
            }
        }

        BinaryClassifier::Linear { weights, bias }
    }

    /// Raw margin `w.x + b`; `None` for a constant head.
    pub fn decision(&self, x: &SparseVector) -> Option<f64> {
        match self {
            BinaryClassifier::Linear { weights, bias } => Some(x.dot(weights) + bias),
            BinaryClassifier::Constant { .. } => None,
        }
    }

    pub fn predict(&self, x: &SparseVector) -> u8 {
        match self {
            BinaryClassifier::Constant { label } => *label,
            BinaryClassifier::Linear { .. } => match self.decision(x) {
                Some(z) if z > 0.0 => 1,
                _ => 0,
            },
        }
    }

    pub fn predict_proba(&self, x: &SparseVector) -> Probability {
        match self {
            BinaryClassifier::Constant { label } => Probability::Degenerate { label: *label },
            BinaryClassifier::Linear { weights, bias } => {
                Probability::Estimated(sigmoid(x.dot(weights) + bias))
            }
        }
    }
}

/// Five independent heads over a shared feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitClassifier {
    config: ClassifierConfig,
    n_features: usize,
    heads: Option<TraitMap<BinaryClassifier>>,
}

impl TraitClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        TraitClassifier {
            config,
            n_features: 0,
            heads: None,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        self.heads.is_some()
    }

    pub fn head(&self, t: Trait) -> Option<&BinaryClassifier> {
        self.heads.as_ref().map(|heads| &heads[t])
    }

    /// Fit all five heads. `labels` has one row per sample and one column per
    /// trait in canonical order.
    ///
    /// Returns the traits that fell back to a constant head.
    pub fn fit(
        &mut self,
        features: &[SparseVector],
        labels: &Array2<u8>,
    ) -> Result<Vec<DegenerateTrait>> {
        if features.is_empty() {
            return Err(Error::InvalidInput(
                "cannot fit classifier on zero samples".to_string(),
            ));
        }
        if labels.nrows() != features.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} label rows",
                features.len(),
                labels.nrows()
            )));
        }
        if labels.ncols() != Trait::ALL.len() {
            return Err(Error::InvalidInput(format!(
                "expected {} label columns, got {}",
                Trait::ALL.len(),
                labels.ncols()
            )));
        }
        let n_features = features[0].dim;
        if let Some(row) = features.iter().find(|row| row.dim != n_features) {
            return Err(Error::InvalidInput(format!(
                "inconsistent feature dimensions {} and {}",
                n_features, row.dim
            )));
        }

        let heads = TraitMap::from_fn(|t| {
            BinaryClassifier::fit(features, labels.column(t.index()), n_features, &self.config)
        });

        let degenerate: Vec<DegenerateTrait> = heads
            .iter()
            .filter_map(|(t, head)| match head {
                BinaryClassifier::Constant { label } => Some(DegenerateTrait {
                    target: t,
                    label: *label,
                }),
                BinaryClassifier::Linear { .. } => None,
            })
            .collect();
        for d in &degenerate {
            warn!(
                trait_name = d.target.name(),
                label = d.label,
                "single-class label column, using constant predictor"
            );
        }

        self.n_features = n_features;
        self.heads = Some(heads);
        Ok(degenerate)
    }

    fn fitted_heads(&self) -> Result<&TraitMap<BinaryClassifier>> {
        self.heads
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("classifier is not fitted".to_string()))
    }

    fn check_input(&self, x: &SparseVector) -> Result<()> {
        if x.dim != self.n_features {
            return Err(Error::InvalidInput(format!(
                "feature dimension {} does not match classifier dimension {}",
                x.dim, self.n_features
            )));
        }
        Ok(())
    }

    /// Binary label per trait.
    pub fn predict(&self, x: &SparseVector) -> Result<TraitMap<u8>> {
        let heads = self.fitted_heads()?;
        self.check_input(x)?;
        Ok(heads.map(|_, head| head.predict(x)))
    }

    /// Positive-class probability per trait.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<TraitMap<Probability>> {
        let heads = self.fitted_heads()?;
        self.check_input(x)?;
        Ok(heads.map(|_, head| head.predict_proba(x)))
    }

    /// Check that every linear head matches the recorded feature dimension.
    pub fn validate(&self) -> Result<()> {
        let heads = self.fitted_heads().map_err(|_| {
            Error::CorruptBundle("classifier has no fitted heads".to_string())
        })?;
        for (t, head) in heads.iter() {
            if let BinaryClassifier::Linear { weights, .. } = head {
                if weights.len() != self.n_features {
                    return Err(Error::CorruptBundle(format!(
                        "{} head has {} weights, expected {}",
                        t,
                        weights.len(),
                        self.n_features
                    )));
                }
            }
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

//! Prediction with a trained bundle.
//!
//! Text is preprocessed with the settings recorded in the bundle, never with
//! the caller's current configuration, so prediction always matches training.
//!
//! [`Predictor::predict`] is strict and returns errors. [`predict_with_bundle`]
//! is the fallback entry point for callers that must always get an answer:
//! any failure turns into an all-zero result tagged with its reason.

use crate::bigfive::TraitMap;
use crate::error::Result;
use crate::model::classifier::Probability;
use crate::model::save::ModelBundle;
use crate::preprocess::TextPipeline;
use crate::resources::Resources;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, warn};

/// How a [`Prediction`] was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum PredictionStatus {
    /// Labels come from the classifier
    Predicted,
    /// Nothing survived preprocessing; labels are all zero
    EmptyText,
    /// Bundle loading or inference failed; labels are all zero
    Failed(String),
}

/// Binary label per trait plus how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub labels: TraitMap<u8>,
    pub status: PredictionStatus,
}

impl Prediction {
    fn zeros(status: PredictionStatus) -> Self {
        Prediction {
            labels: TraitMap::splat(0),
            status,
        }
    }

    pub fn empty_text() -> Self {
        Prediction::zeros(PredictionStatus::EmptyText)
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Prediction::zeros(PredictionStatus::Failed(reason.into()))
    }

    pub fn is_predicted(&self) -> bool {
        self.status == PredictionStatus::Predicted
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels)?;
        match &self.status {
            PredictionStatus::Predicted => Ok(()),
            PredictionStatus::EmptyText => write!(f, " (empty text)"),
            PredictionStatus::Failed(reason) => write!(f, " (failed: {})", reason),
        }
    }
}

/// A loaded bundle plus the text pipeline it was trained with.
pub struct Predictor {
    bundle: ModelBundle,
    pipeline: TextPipeline,
}

impl Predictor {
    pub fn from_bundle(bundle: ModelBundle, resources: Arc<Resources>) -> Self {
        let current = resources.summary();
        if current != bundle.metadata.resources {
            warn!(
                trained = ?bundle.metadata.resources,
                current = ?current,
                "word lists differ from the ones used at training time"
            );
        }
        let pipeline = TextPipeline::new(resources, bundle.preprocess);
        Predictor { bundle, pipeline }
    }

    /// Load a bundle from disk and wrap it in a predictor.
    ///
    /// # Arguments
    ///
    /// * `path` - Bundle file
    /// * `resources` - Word lists for the text pipeline
    pub fn load(path: impl AsRef<Path>, resources: Arc<Resources>) -> Result<Self> {
        let bundle = ModelBundle::load(path)?;
        Ok(Predictor::from_bundle(bundle, resources))
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Predict binary trait labels for one text.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw input text
    ///
    /// # Returns
    ///
    /// Labels in trait order; `EmptyText` status with all zeros when nothing
    /// survives preprocessing
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let document = self.pipeline.process_to_document(text);
        if document.is_empty() {
            return Ok(Prediction::empty_text());
        }
        let x = self.bundle.vectorizer.transform(&document);
        let labels = self.bundle.classifier.predict(&x)?;
        Ok(Prediction {
            labels,
            status: PredictionStatus::Predicted,
        })
    }

    /// Positive-class probability per trait. Text that preprocesses to
    /// nothing is scored as the zero vector, i.e. by the biases alone.
    pub fn predict_proba(&self, text: &str) -> Result<TraitMap<Probability>> {
        let document = self.pipeline.process_to_document(text);
        let x = self.bundle.vectorizer.transform(&document);
        self.bundle.classifier.predict_proba(&x)
    }
}

/// Load the bundle at `path` and predict, never failing.
///
/// Load or inference errors are logged and reported through
/// [`PredictionStatus::Failed`] with all labels 0.
///
/// # Arguments
///
/// * `text` - Raw input text
/// * `path` - Bundle file
/// * `resources` - Word lists for the text pipeline
pub fn predict_with_bundle(
    text: &str,
    path: impl AsRef<Path>,
    resources: Arc<Resources>,
) -> Prediction {
    let path = path.as_ref();
    let result = Predictor::load(path, resources).and_then(|p| p.predict(text));
    match result {
        Ok(prediction) => prediction,
        Err(e) => {
            error!(path = %path.display(), error = %e, "prediction failed");
            Prediction::failed(e.to_string())
        }
    }
}

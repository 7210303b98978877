//! Model bundle persistence.
//!
//! A bundle is one JSON document holding everything prediction needs: the
//! fitted vectorizer, the five classifier heads and the preprocessing
//! settings used at training time. Bundles are written to a temporary
//! sibling file first and renamed into place, so an interrupted save never
//! leaves a truncated bundle behind.

use crate::error::{Error, Result};
use crate::model::classifier::{DegenerateTrait, TraitClassifier};
use crate::model::evaluate::EvaluationReport;
use crate::model::tfidf::TfidfVectorizer;
use crate::preprocess::PreprocessConfig;
use crate::resources::ResourceSummary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Current bundle layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Training provenance stored alongside the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Version of this crate that wrote the bundle
    pub crate_version: String,
    pub train_samples: usize,
    pub validation_samples: usize,
    pub stratified_split: bool,
    pub seed: u64,
    /// Word-list sizes at training time
    pub resources: ResourceSummary,
    pub degenerate_traits: Vec<DegenerateTrait>,
    pub validation: EvaluationReport,
}

/// Trained vectorizer + classifier + preprocessing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub preprocess: PreprocessConfig,
    pub vectorizer: TfidfVectorizer,
    pub classifier: TraitClassifier,
    pub metadata: BundleMetadata,
}

impl ModelBundle {
    pub fn new(
        preprocess: PreprocessConfig,
        vectorizer: TfidfVectorizer,
        classifier: TraitClassifier,
        metadata: BundleMetadata,
    ) -> Self {
        ModelBundle {
            format_version: FORMAT_VERSION,
            preprocess,
            vectorizer,
            classifier,
            metadata,
        }
    }

    /// Check internal consistency of the vectorizer and classifier.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.classifier.validate()?;
        if self.vectorizer.dim() != self.classifier.n_features() {
            return Err(Error::CorruptBundle(format!(
                "vectorizer produces {} features but classifier expects {}",
                self.vectorizer.dim(),
                self.classifier.n_features()
            )));
        }
        Ok(())
    }

    /// Save the bundle, creating parent directories as needed.
    ///
    /// The JSON is written to a sibling `.tmp` file and renamed into place.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file for the bundle
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = temp_path(path);
        if let Err(e) = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(path = %path.display(), "model bundle saved");
        Ok(())
    }

    /// Load and validate a bundle.
    ///
    /// # Arguments
    ///
    /// * `path` - Bundle file written by [`ModelBundle::save`]
    ///
    /// # Returns
    ///
    /// The bundle, or `IncompatibleBundle` / `CorruptBundle` when it cannot be used
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        let found = value
            .get("format_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| Error::CorruptBundle("missing format_version".to_string()))?;
        if found != u64::from(FORMAT_VERSION) {
            return Err(Error::IncompatibleBundle {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                expected: FORMAT_VERSION,
            });
        }

        let bundle: ModelBundle = serde_json::from_value(value)?;
        bundle.validate()?;
        info!(
            path = %path.display(),
            features = bundle.vectorizer.dim(),
            "model bundle loaded"
        );
        Ok(bundle)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigfive::Trait;
    use crate::model::classifier::{BinaryClassifier, ClassifierConfig};
    use crate::resources::Resources;
    use ndarray::array;

    fn small_bundle() -> ModelBundle {
        let docs: Vec<String> = ["teman senang", "cemas takut", "teman ramai", "takut panik"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut vectorizer = TfidfVectorizer::new(50);
        let rows = vectorizer.fit_transform(&docs).unwrap();
        let labels = array![
            [0u8, 1, 1, 0, 0],
            [0, 0, 0, 1, 1],
            [0, 1, 1, 0, 0],
            [0, 0, 0, 1, 1],
        ];
        let mut classifier = TraitClassifier::new(ClassifierConfig::default());
        let degenerate = classifier.fit(&rows, &labels).unwrap();
        let metadata = BundleMetadata {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            train_samples: 4,
            validation_samples: 0,
            stratified_split: false,
            seed: 42,
            resources: Resources::builtin().summary(),
            degenerate_traits: degenerate,
            validation: EvaluationReport::default(),
        };
        ModelBundle::new(PreprocessConfig::strict(), vectorizer, classifier, metadata)
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bundle.json");
        let bundle = small_bundle();
        bundle.save(&path).unwrap();
        assert!(!temp_path(&path).exists());

        let loaded = ModelBundle::load(&path).unwrap();
        assert_eq!(loaded, bundle);
        if let (
            Some(BinaryClassifier::Linear { weights: a, bias: ba }),
            Some(BinaryClassifier::Linear { weights: b, bias: bb }),
        ) = (
            bundle.classifier.head(Trait::Extraversion),
            loaded.classifier.head(Trait::Extraversion),
        ) {
            assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
            assert_eq!(ba.to_bits(), bb.to_bits());
        } else {
            panic!("extraversion head should be linear");
        }

        let x = loaded.vectorizer.transform("teman senang");
        assert_eq!(
            loaded.classifier.predict(&x).unwrap(),
            bundle.classifier.predict(&x).unwrap()
        );
    }

    #[test]
    fn test_degenerate_traits_recorded() {
        let bundle = small_bundle();
        assert_eq!(bundle.metadata.degenerate_traits.len(), 1);
        assert_eq!(bundle.metadata.degenerate_traits[0].target, Trait::Openness);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelBundle::load(dir.path().join("nope.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_incompatible_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let mut value = serde_json::to_value(small_bundle()).unwrap();
        value["format_version"] = serde_json::json!(99);
        std::fs::write(&path, value.to_string()).unwrap();
        match ModelBundle::load(&path) {
            Err(Error::IncompatibleBundle { found, expected }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected incompatible bundle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_garbage_and_truncated_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ModelBundle::load(&path), Err(Error::Json(_))));

        std::fs::write(&path, "{\"vectorizer\": {}}").unwrap();
        assert!(matches!(ModelBundle::load(&path), Err(Error::CorruptBundle(_))));
    }

    #[test]
    fn test_dimension_mismatch_detected() {
        let mut bundle = small_bundle();
        bundle.vectorizer = TfidfVectorizer::new(50);
        bundle
            .vectorizer
            .fit(&["satu dua tiga empat lima enam".to_string()])
            .unwrap();
        assert!(matches!(bundle.validate(), Err(Error::CorruptBundle(_))));
    }
}

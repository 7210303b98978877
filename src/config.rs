//! Configuration structures for the trait engine.
//!
//! Configuration is read from a TOML file (`config.toml` by default). Every
//! section and every field has a default, so a partial file only overrides
//! what it names:
//!
//! ```toml
//! [data]
//! csv_path = "data/dataset.csv"
//! validation_split = 0.15
//! seed = 42
//!
//! [preprocess]
//! negation_window = 3
//! stem = true
//! remove_stopwords = true
//!
//! [resources]
//! stopwords = "data/stopwords.txt"
//!
//! [features]
//! max_features = 4000
//!
//! [model]
//! learning_rate = 0.5
//! epochs = 400
//! class_weight = "balanced"
//!
//! [lexicon]
//! negation_policy = "exclude"
//!
//! [output]
//! model_dir = "models"
//! bundle_file = "personality_clf.json"
//! ```

use crate::error::Result;
use crate::lexicon::NegationPolicy;
use crate::model::classifier::ClassifierConfig;
use crate::preprocess::PreprocessConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset location and split
    pub data: DataConfig,
    /// Text pipeline strictness
    pub preprocess: PreprocessConfig,
    /// Word-list file overrides
    pub resources: ResourceConfig,
    /// Vectorizer settings
    pub features: FeaturesConfig,
    /// Classifier hyperparameters
    pub model: ClassifierConfig,
    /// Lexicon scoring
    pub lexicon: LexiconConfig,
    /// Where trained bundles go
    pub output: OutputConfig,
}

/// Data loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the labelled CSV dataset
    pub csv_path: String,
    /// Fraction of records held out for validation
    pub validation_split: f64,
    /// Seed of the split RNG
    pub seed: u64,
}

/// Optional word-list paths. `None` selects the embedded list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub stopwords: Option<String>,
    pub slang: Option<String>,
    pub root_words: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Vocabulary size cap of the TF-IDF vectorizer
    pub max_features: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub negation_policy: NegationPolicy,
}

/// Output paths configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the bundle is written to
    pub model_dir: String,
    /// Bundle filename inside `model_dir`
    pub bundle_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            csv_path: "data/dataset.csv".to_string(),
            validation_split: 0.15,
            seed: 42,
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        FeaturesConfig { max_features: 4000 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            model_dir: "models".to_string(),
            bundle_file: "personality_clf.json".to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of the bundle file.
    pub fn bundle_path(&self) -> PathBuf {
        Path::new(&self.model_dir).join(&self.bundle_file)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Fails when the file cannot be read or is not valid TOML for this
    /// structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Like [`Config::load`], but falls back to the defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Config::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "could not load config, using defaults");
            Config::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::ClassWeight;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.validation_split, 0.15);
        assert_eq!(config.data.seed, 42);
        assert_eq!(config.features.max_features, 4000);
        assert_eq!(config.model.class_weight, ClassWeight::Balanced);
        assert_eq!(config.lexicon.negation_policy, NegationPolicy::Exclude);
        assert_eq!(config.preprocess, PreprocessConfig::strict());
        assert_eq!(
            config.output.bundle_path(),
            Path::new("models").join("personality_clf.json")
        );
    }

    #[test]
    fn test_partial_file_overrides() {
        let config: Config = toml::from_str(
            r#"
            [data]
            seed = 7

            [preprocess]
            stem = false

            [lexicon]
            negation_policy = "count"

            [model]
            class_weight = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.data.validation_split, 0.15);
        assert!(!config.preprocess.stem);
        assert_eq!(config.lexicon.negation_policy, NegationPolicy::Count);
        assert_eq!(config.model.class_weight, ClassWeight::None);
        assert_eq!(config.features.max_features, 4000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[features]\nmax_features = 12").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.features.max_features, 12);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[features]\nmax_features = \"many\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(crate::error::Error::Toml(_))
        ));
        assert_eq!(Config::load_or_default(file.path()), Config::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_or_default("/nonexistent/config.toml");
        assert_eq!(config, Config::default());
    }
}

//! Model training pipeline.
//!
//! 1. Preprocess every record with the configured [`PreprocessConfig`]
//! 2. Fit the TF-IDF vectorizer on the whole processed corpus
//! 3. Split into train/validation with a seeded RNG
//! 4. Fit the five classifier heads on the training partition
//! 5. Evaluate on the validation partition
//! 6. Persist one [`ModelBundle`]
//!
//! [`PreprocessConfig`]: crate::preprocess::PreprocessConfig

use crate::bigfive::TraitMap;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::classifier::{DegenerateTrait, TraitClassifier};
use crate::model::data::{label_matrix, load_dataset, split_indices, TraitRecord};
use crate::model::evaluate::EvaluationReport;
use crate::model::save::{BundleMetadata, ModelBundle};
use crate::model::tfidf::{SparseVector, TfidfVectorizer};
use crate::preprocess::TextPipeline;
use crate::resources::Resources;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub report: EvaluationReport,
    /// Traits that fell back to a constant predictor
    pub warnings: Vec<DegenerateTrait>,
    /// Where the bundle was written, if it was
    pub bundle_path: Option<PathBuf>,
}

/// Configured training job.
pub struct TrainingPipeline {
    config: Config,
    pipeline: TextPipeline,
}

impl TrainingPipeline {
    pub fn new(config: &Config, resources: Arc<Resources>) -> Self {
        TrainingPipeline {
            config: config.clone(),
            pipeline: TextPipeline::new(resources, config.preprocess),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Train and evaluate in memory without writing anything.
    pub fn fit(&self, records: &[TraitRecord]) -> Result<TrainingOutcome> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let start = Instant::now();

        let documents: Vec<String> = records
            .iter()
            .map(|r| self.pipeline.process_to_document(&r.text))
            .collect();
        let empty_docs = documents.iter().filter(|d| d.is_empty()).count();
        if empty_docs > 0 {
            debug!(empty_docs, "records with no tokens after preprocessing");
        }

        let mut vectorizer = TfidfVectorizer::new(self.config.features.max_features);
        let features = vectorizer.fit_transform(&documents)?;
        info!(
            documents = documents.len(),
            features = vectorizer.dim(),
            "vectorizer fitted"
        );

        let split = split_indices(
            records,
            self.config.data.validation_split,
            self.config.data.seed,
        );
        info!(
            train = split.train.len(),
            validation = split.validation.len(),
            stratified = split.stratified,
            "dataset split"
        );

        let train_records = select(records, &split.train);
        let train_features = select(&features, &split.train);

        let mut classifier = TraitClassifier::new(self.config.model.clone());
        let warnings = classifier.fit(&train_features, &label_matrix(&train_records))?;

        let report = evaluate(&classifier, &features, records, &split.validation)?;
        for (t, m) in report.per_trait.iter() {
            info!(
                trait_name = t.name(),
                precision = m.precision,
                recall = m.recall,
                f1 = m.f1,
                support = m.support,
                "validation metrics"
            );
        }
        info!(
            macro_f1 = report.macro_f1(),
            seconds = start.elapsed().as_secs_f64(),
            "training finished"
        );

        let metadata = BundleMetadata {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            train_samples: split.train.len(),
            validation_samples: split.validation.len(),
            stratified_split: split.stratified,
            seed: self.config.data.seed,
            resources: self.pipeline.resources().summary(),
            degenerate_traits: warnings.clone(),
            validation: report.clone(),
        };
        let bundle = ModelBundle::new(self.config.preprocess, vectorizer, classifier, metadata);

        Ok(TrainingOutcome {
            bundle,
            report,
            warnings,
            bundle_path: None,
        })
    }

    /// Train, evaluate and save the bundle to `[output]`.
    pub fn run(&self, records: &[TraitRecord]) -> Result<TrainingOutcome> {
        let mut outcome = self.fit(records)?;
        let path = self.config.output.bundle_path();
        outcome.bundle.save(&path)?;
        outcome.bundle_path = Some(path);
        Ok(outcome)
    }
}

fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

fn evaluate(
    classifier: &TraitClassifier,
    features: &[SparseVector],
    records: &[TraitRecord],
    indices: &[usize],
) -> Result<EvaluationReport> {
    let truth: Vec<TraitMap<u8>> = indices.iter().map(|&i| records[i].labels).collect();
    let predicted = indices
        .iter()
        .map(|&i| classifier.predict(&features[i]))
        .collect::<Result<Vec<_>>>()?;
    Ok(EvaluationReport::from_predictions(&truth, &predicted))
}

/// Load the configured CSV and run the full pipeline.
pub fn train_from_config(config: &Config, resources: Arc<Resources>) -> Result<TrainingOutcome> {
    let records = load_dataset(&config.data.csv_path)?;
    TrainingPipeline::new(config, resources).run(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigfive::Trait;
    use crate::model::classifier::BinaryClassifier;
    use crate::model::predict::Predictor;
    use crate::preprocess::PreprocessConfig;
    use std::io::Write;

    fn resources() -> Arc<Resources> {
        Arc::new(Resources::builtin())
    }

    fn sample_records() -> Vec<TraitRecord> {
        let rows: [(&str, [u8; 5]); 8] = [
            ("aku suka nongkrong sama teman, ramai seru", [0, 0, 1, 1, 0]),
            ("ngobrol sama teman itu senang banget", [0, 0, 1, 1, 0]),
            ("hangout terus, mabar sama teman", [0, 0, 1, 1, 0]),
            ("teman ngajak ngobrol, aku senang", [0, 0, 1, 1, 0]),
            ("aku cemas dan takut soal ujian", [0, 1, 0, 0, 1]),
            ("khawatir terus, gelisah tiap malam", [0, 1, 0, 0, 1]),
            ("panik dan overthinking, takut gagal", [0, 1, 0, 0, 1]),
            ("galau, cemas, baper terus", [0, 1, 0, 0, 1]),
        ];
        rows.iter()
            .map(|(text, labels)| TraitRecord::new(*text, *labels))
            .collect()
    }

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.output.model_dir = dir.to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_empty_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let result = TrainingPipeline::new(&config, resources()).run(&[]);
        assert!(matches!(result, Err(Error::EmptyDataset)));
        assert!(!config.output.bundle_path().exists());
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "text,openness,conscientiousness,extraversion,agreeableness").unwrap();
        writeln!(file, "halo,0,0,0,0").unwrap();

        let mut config = test_config(dir.path());
        config.data.csv_path = csv_path.to_string_lossy().into_owned();
        match train_from_config(&config, resources()) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "neuroticism"),
            other => panic!("expected missing column, got {:?}", other.map(|_| ())),
        }
        assert!(!config.output.bundle_path().exists());
    }

    #[test]
    fn test_all_zero_trait_column_degrades_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let outcome = TrainingPipeline::new(&config, resources())
            .run(&sample_records())
            .unwrap();

        assert!(outcome.warnings.iter().any(|w| w.target == Trait::Openness && w.label == 0));
        assert_eq!(
            outcome.bundle.classifier.head(Trait::Openness),
            Some(&BinaryClassifier::Constant { label: 0 })
        );
        let path = outcome.bundle_path.clone().unwrap();
        assert!(path.exists());

        let predictor = Predictor::load(&path, resources()).unwrap();
        let prediction = predictor.predict("aku senang ngobrol sama teman").unwrap();
        assert_eq!(prediction.labels[Trait::Openness], 0);
    }

    #[test]
    fn test_saved_bundle_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let outcome = TrainingPipeline::new(&config, resources())
            .run(&sample_records())
            .unwrap();
        let loaded = ModelBundle::load(outcome.bundle_path.as_ref().unwrap()).unwrap();
        assert_eq!(loaded, outcome.bundle);
        assert_eq!(loaded.preprocess, PreprocessConfig::strict());
        assert_eq!(loaded.metadata.seed, 42);
        assert_eq!(
            loaded.metadata.train_samples + loaded.metadata.validation_samples,
            8
        );
    }

    #[test]
    fn test_training_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let pipeline = TrainingPipeline::new(&config, resources());
        let a = pipeline.fit(&sample_records()).unwrap();
        let b = pipeline.fit(&sample_records()).unwrap();
        assert_eq!(a.bundle, b.bundle);
        assert_eq!(a.report, b.report);
        assert!(a.bundle_path.is_none());
    }

    #[test]
    fn test_light_preprocessing_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.preprocess = PreprocessConfig::light();
        let outcome = TrainingPipeline::new(&config, resources())
            .fit(&sample_records())
            .unwrap();
        assert_eq!(outcome.bundle.preprocess, PreprocessConfig::light());
        // stopwords survive light preprocessing
        assert!(outcome.bundle.vectorizer.vocabulary().contains_key("sama"));
    }

    #[test]
    fn test_report_covers_validation_partition() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let outcome = TrainingPipeline::new(&config, resources())
            .fit(&sample_records())
            .unwrap();
        assert_eq!(outcome.report.samples, outcome.bundle.metadata.validation_samples);
        assert!(outcome.report.samples > 0);
        assert!(outcome.report.to_string().contains("extraversion"));
    }
}

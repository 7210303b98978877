//! Supervised Big-Five trait classifier
//!
//! This module implements the supervised half of the engine: a multi-label
//! classifier that predicts a 0/1 label for each of the five traits from
//! processed chat text.
//!
//! ## Architecture
//!
//! - **TF-IDF** over unigrams and bigrams of the processed token stream
//!   (negated tokens appear as `NOT_<stem>` terms)
//! - **Five logistic-regression heads**, one per trait, trained independently
//!
//! A trait whose training labels are all identical gets a constant head and
//! a warning instead of aborting training.
//!
//! ## Usage
//!
//! ### Training
//!
//! ```bash
//! ./target/release/sifat train --csv data/dataset.csv
//! ```
//!
//! ### Prediction
//!
//! ```bash
//! ./target/release/sifat predict "aku suka nongkrong sama teman"
//! ```
//!
//! ### As a Library
//!
//! ```no_run
//! use sifat::config::Config;
//! use sifat::model::train::train_from_config;
//! use sifat::Resources;
//! use std::sync::Arc;
//!
//! let config = Config::load_or_default("config.toml");
//! let resources = Arc::new(Resources::from_config(&config.resources)?);
//! let outcome = train_from_config(&config, resources)?;
//! println!("{}", outcome.report);
//! # Ok::<(), sifat::Error>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`tfidf`] - TF-IDF vectorizer and sparse rows
//! - [`classifier`] - Per-trait logistic regression heads
//! - [`data`] - Dataset records, CSV loading, seeded split
//! - [`train`] - Training pipeline
//! - [`evaluate`] - Validation metrics
//! - [`save`] - Bundle persistence
//! - [`predict`] - Prediction with fallback
//! - `cli` - Command-line interface (feature `cli`)

pub mod classifier;
pub mod data;
pub mod evaluate;
pub mod predict;
pub mod save;
pub mod tfidf;
pub mod train;

#[cfg(feature = "cli")]
pub mod cli;

pub use classifier::{ClassWeight, ClassifierConfig, DegenerateTrait, Probability, TraitClassifier};
pub use data::{load_dataset, TraitRecord};
pub use predict::{predict_with_bundle, Prediction, PredictionStatus, Predictor};
pub use save::ModelBundle;
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use train::{train_from_config, TrainingOutcome, TrainingPipeline};

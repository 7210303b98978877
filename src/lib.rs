//! # Sifat - Big-Five trait signals from Indonesian chat
//!
//! Infers Big-Five personality trait signals (openness, conscientiousness,
//! extraversion, agreeableness, neuroticism) from informal Indonesian chat
//! text with two complementary techniques:
//!
//! - **Lexicon scoring**: stemmed keyword counts per trait, always available
//! - **Supervised classifier**: TF-IDF features and five logistic-regression
//!   heads, trained from a labelled CSV
//!
//! Both paths share one text pipeline: URL/mention stripping, slang
//! normalization, negation scope tagging, Indonesian stemming and stopword
//! removal.
//!
//! ## Quick Start
//!
//! ```
//! use sifat::api::Analyzer;
//! use sifat::Trait;
//!
//! let analyzer = Analyzer::builtin();
//! let scores = analyzer.lexicon_scores("gw suka nongkrong sama teman, ramai banget");
//!
//! for (t, v) in scores.normalized.iter() {
//!     println!("{}: {:.2}", t, v);
//! }
//! assert_eq!(scores.dominant(), Some(Trait::Extraversion));
//! ```
//!
//! ### Negation
//!
//! Tokens up to three positions after a negation cue (`tidak`, `gak`, ...)
//! are flagged as negated. By default negated keywords do not count:
//!
//! ```
//! use sifat::api::Analyzer;
//!
//! let analyzer = Analyzer::builtin();
//! assert!(analyzer.lexicon_scores("saya tidak senang").is_empty());
//! ```
//!
//! ### Model Prediction
//!
//! ```no_run
//! use sifat::model::Predictor;
//! use sifat::{Resources, Trait};
//! use std::sync::Arc;
//!
//! let predictor = Predictor::load("models/personality_clf.json", Arc::new(Resources::builtin()))?;
//! let prediction = predictor.predict("aku cemas terus, takut gagal")?;
//! println!("neuroticism: {}", prediction.labels[Trait::Neuroticism]);
//! # Ok::<(), sifat::Error>(())
//! ```
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `cli` | Include CLI binary | ✓ |
//!
//! ## Examples
//!
//! ```bash
//! cargo run --example simple
//! cargo run --example batch
//! ```
//!
//! ## License
//!
//! GNU General Public License v3.0 (GPLv3)

// Public API modules
pub mod api;
pub mod chat;
pub mod config;

// Core modules
pub mod bigfive;
pub mod error;
pub mod lexicon;
pub mod logging;
pub mod model;
pub mod preprocess;
pub mod resources;

pub use bigfive::{Trait, TraitMap};
pub use error::{Error, Result};
pub use lexicon::{Lexicon, LexiconScores, NegationPolicy};
pub use preprocess::{PreprocessConfig, TextPipeline, Token};
pub use resources::Resources;

//! Text-to-token pipeline.
//!
//! Raw text flows through three stages:
//!
//! 1. [`normalizer`] - URL/mention stripping, lowercasing, Unicode word
//!    tokenization and slang normalization
//! 2. [`negation`] - negation scope tagging
//! 3. stem / filter - numeric and short tokens dropped, stems computed with
//!    [`stemmer::IndonesianStemmer`], stopwords removed
//!
//! The behaviour of stage 3 is controlled by [`PreprocessConfig`]. The same
//! config is stored in trained bundles so prediction reproduces exactly the
//! preprocessing used at training time.

pub mod negation;
pub mod normalizer;
pub mod stemmer;

pub use negation::{tag_negation, Token, DEFAULT_NEGATION_WINDOW};
pub use normalizer::TextNormalizer;
pub use stemmer::IndonesianStemmer;

use crate::resources::Resources;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Strictness knobs of the stem/filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Tokens covered after each negation cue
    pub negation_window: usize,
    /// Reduce tokens to stems
    pub stem: bool,
    /// Drop tokens whose (stemmed) form is a stopword
    pub remove_stopwords: bool,
    /// Drop tokens shorter than this many characters
    pub min_token_len: usize,
}

impl PreprocessConfig {
    /// Full stemming and stopword removal.
    pub fn strict() -> Self {
        PreprocessConfig {
            negation_window: DEFAULT_NEGATION_WINDOW,
            stem: true,
            remove_stopwords: true,
            min_token_len: 1,
        }
    }

    /// Keeps surface forms and stopwords; only drops one-letter tokens.
    pub fn light() -> Self {
        PreprocessConfig {
            negation_window: DEFAULT_NEGATION_WINDOW,
            stem: false,
            remove_stopwords: false,
            min_token_len: 2,
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig::strict()
    }
}

/// Configured text pipeline. Cheap to clone; resources are shared.
#[derive(Debug, Clone)]
pub struct TextPipeline {
    config: PreprocessConfig,
    normalizer: TextNormalizer,
    stemmer: IndonesianStemmer,
    resources: Arc<Resources>,
}

impl TextPipeline {
    pub fn new(resources: Arc<Resources>, config: PreprocessConfig) -> Self {
        TextPipeline {
            config,
            normalizer: TextNormalizer::new(Arc::clone(&resources)),
            stemmer: IndonesianStemmer::new(Arc::clone(&resources.root_words)),
            resources,
        }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    pub fn stemmer(&self) -> &IndonesianStemmer {
        &self.stemmer
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize(text)
    }

    /// Run the full pipeline on raw text.
    pub fn process(&self, text: &str) -> Vec<Token> {
        let words = self.normalizer.normalize(text);
        let tagged = tag_negation(words, self.config.negation_window);
        self.filter(tagged)
    }

    /// Processed tokens as one whitespace-joined document for the vectorizer.
    pub fn process_to_document(&self, text: &str) -> String {
        to_document(&self.process(text))
    }

    /// Stem/filter stage on already tagged tokens.
    pub fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter_map(|token| self.filter_token(token))
            .collect()
    }

    fn filter_token(&self, token: Token) -> Option<Token> {
        let Token { text, negated } = token;

        if text.is_empty() || text.chars().all(char::is_numeric) {
            return None;
        }
        if text.chars().count() < self.config.min_token_len {
            return None;
        }

        let stem = if self.config.stem {
            self.stemmer.stem(&text)
        } else {
            text
        };

        if stem.is_empty() || (self.config.remove_stopwords && self.resources.is_stopword(&stem)) {
            return None;
        }

        Some(Token {
            text: stem,
            negated,
        })
    }
}

/// Join token surfaces (`NOT_` marked where negated) with single spaces.
pub fn to_document(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::surface)
        .collect::<Vec<_>>()
        .join(" ")
}

//! High-level API for trait scoring and prediction.
//!
//! [`Analyzer`] bundles the shared word lists, a text pipeline and the trait
//! lexicon behind one handle. Build it once and reuse it; it is immutable and
//! can be shared across threads.
//!
//! # Quick Start
//!
//! ```
//! use sifat::api::Analyzer;
//! use sifat::Trait;
//!
//! let analyzer = Analyzer::builtin();
//! let scores = analyzer.lexicon_scores("saya sangat disiplin dan tepat waktu");
//! assert_eq!(scores.dominant(), Some(Trait::Conscientiousness));
//! ```
//!
//! # Chat Reports
//!
//! ```no_run
//! use sifat::api::Analyzer;
//! use sifat::chat::read_chat_file;
//! use std::path::Path;
//!
//! let analyzer = Analyzer::builtin();
//! let chat = read_chat_file("chat.txt")?;
//! let report = analyzer.analyze_chat(&chat, Some(Path::new("models/personality_clf.json")));
//! println!("{}", report);
//! # Ok::<(), sifat::Error>(())
//! ```

use crate::chat::{ChatReport, ChatTranscript};
use crate::config::Config;
use crate::error::Result;
use crate::lexicon::{Lexicon, LexiconScores, NegationPolicy};
use crate::model::predict::{predict_with_bundle, Prediction};
use crate::preprocess::{PreprocessConfig, TextPipeline, Token};
use crate::resources::Resources;
use std::path::Path;
use std::sync::Arc;

/// Text pipeline + lexicon over one set of word lists.
#[derive(Debug, Clone)]
pub struct Analyzer {
    resources: Arc<Resources>,
    pipeline: TextPipeline,
    lexicon: Lexicon,
}

impl Analyzer {
    pub fn new(
        resources: Arc<Resources>,
        preprocess: PreprocessConfig,
        policy: NegationPolicy,
    ) -> Self {
        let pipeline = TextPipeline::new(Arc::clone(&resources), preprocess);
        let lexicon = Lexicon::new(pipeline.stemmer(), policy);
        lexicon.check_against(&resources);
        Analyzer {
            resources,
            pipeline,
            lexicon,
        }
    }

    /// Embedded word lists, strict preprocessing, default negation policy.
    pub fn builtin() -> Self {
        Analyzer::new(
            Arc::new(Resources::builtin()),
            PreprocessConfig::default(),
            NegationPolicy::default(),
        )
    }

    /// Word lists, preprocessing and negation policy from a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resources = Arc::new(Resources::from_config(&config.resources)?);
        Ok(Analyzer::new(
            resources,
            config.preprocess,
            config.lexicon.negation_policy,
        ))
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    pub fn pipeline(&self) -> &TextPipeline {
        &self.pipeline
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Normalize, tag negation, stem and filter.
    pub fn process(&self, text: &str) -> Vec<Token> {
        self.pipeline.process(text)
    }

    pub fn lexicon_scores(&self, text: &str) -> LexiconScores {
        self.lexicon_scores_tokens(&self.process(text))
    }

    /// Score an already processed token stream.
    ///
    /// Lexicon keywords are always stems. When the pipeline keeps surface
    /// forms (`stem = false`), tokens are stemmed here before matching.
    pub fn lexicon_scores_tokens(&self, tokens: &[Token]) -> LexiconScores {
        if self.pipeline.config().stem {
            return self.lexicon.score(tokens);
        }
        let stemmer = self.pipeline.stemmer();
        let stemmed: Vec<Token> = tokens
            .iter()
            .map(|token| Token {
                text: stemmer.stem(&token.text),
                negated: token.negated,
            })
            .collect();
        self.lexicon.score(&stemmed)
    }

    pub fn lexicon_scores_batch(&self, texts: &[&str]) -> Vec<LexiconScores> {
        texts.iter().map(|text| self.lexicon_scores(text)).collect()
    }

    /// Model prediction with fallback semantics; never fails.
    pub fn predict(&self, text: &str, bundle_path: impl AsRef<Path>) -> Prediction {
        predict_with_bundle(text, bundle_path, Arc::clone(&self.resources))
    }

    /// Lexicon report for a transcript, plus a model prediction when a
    /// bundle path is given.
    pub fn analyze_chat(&self, chat: &ChatTranscript, bundle_path: Option<&Path>) -> ChatReport {
        ChatReport {
            speaker: chat.speaker.clone(),
            scores: self.lexicon_scores(&chat.text),
            prediction: bundle_path.map(|path| self.predict(&chat.text, path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigfive::Trait;
    use crate::model::predict::PredictionStatus;

    #[test]
    fn test_lexicon_scores() {
        let analyzer = Analyzer::builtin();
        let scores = analyzer.lexicon_scores("saya sangat disiplin dan tepat waktu");
        assert_eq!(scores.raw[Trait::Conscientiousness], 2);
        assert_eq!(scores.dominant(), Some(Trait::Conscientiousness));
    }

    #[test]
    fn test_token_and_text_paths_agree() {
        let analyzer = Analyzer::builtin();
        let text = "gw cemas bgt, takut gak ada teman";
        let tokens = analyzer.process(text);
        assert_eq!(analyzer.lexicon_scores_tokens(&tokens), analyzer.lexicon_scores(text));
    }

    #[test]
    fn test_batch() {
        let analyzer = Analyzer::builtin();
        let scores = analyzer.lexicon_scores_batch(&["cemas", "", "kreatif"]);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].dominant(), Some(Trait::Neuroticism));
        assert!(scores[1].is_empty());
        assert_eq!(scores[2].dominant(), Some(Trait::Openness));
    }

    #[test]
    fn test_count_policy_from_config() {
        let mut config = Config::default();
        config.lexicon.negation_policy = NegationPolicy::Count;
        let analyzer = Analyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.lexicon().policy(), NegationPolicy::Count);
        let scores = analyzer.lexicon_scores("saya tidak senang");
        assert_eq!(scores.raw[Trait::Extraversion], 1);
    }

    #[test]
    fn test_light_preset_matches_stemmed_keywords() {
        let resources = Arc::new(Resources::builtin());
        let strict = Analyzer::new(
            Arc::clone(&resources),
            PreprocessConfig::strict(),
            NegationPolicy::default(),
        );
        let light = Analyzer::new(resources, PreprocessConfig::light(), NegationPolicy::default());

        let text = "dia suka membantu dan berteman";
        let scores = light.lexicon_scores(text);
        assert_eq!(scores.raw[Trait::Extraversion], 1);
        assert_eq!(scores.raw[Trait::Agreeableness], 2);
        assert_eq!(scores, strict.lexicon_scores(text));
        // tokens themselves keep their surface forms
        assert!(light.process(text).iter().any(|t| t.text == "membantu"));
    }

    #[test]
    fn test_derived_forms_score_their_keywords() {
        let analyzer = Analyzer::builtin();
        let scores = analyzer.lexicon_scores("kebaikan dia dan kepanikan saya");
        assert_eq!(scores.raw[Trait::Agreeableness], 1);
        assert_eq!(scores.raw[Trait::Neuroticism], 1);
    }

    #[test]
    fn test_analyze_chat_without_model() {
        let analyzer = Analyzer::builtin();
        let chat = ChatTranscript::parse("[20:01] Rina: aku suka nongkrong sama teman\n");
        let report = analyzer.analyze_chat(&chat, None);
        assert_eq!(report.speaker, "Rina");
        assert_eq!(report.dominant(), Some(Trait::Extraversion));
        assert!(report.prediction.is_none());
    }

    #[test]
    fn test_analyze_chat_with_missing_model() {
        let analyzer = Analyzer::builtin();
        let chat = ChatTranscript::parse("Rina: aku cemas\n");
        let report = analyzer.analyze_chat(&chat, Some(Path::new("/nonexistent/model.json")));
        let prediction = report.prediction.unwrap();
        assert!(matches!(prediction.status, PredictionStatus::Failed(_)));
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
        assert_send_sync::<crate::model::predict::Predictor>();
    }
}
